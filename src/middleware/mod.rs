pub mod headers;

pub use headers::{
    configure_security_headers, security_headers_middleware, SecurityHeadersMiddleware,
    SecurityHeadersMiddlewareService,
};
