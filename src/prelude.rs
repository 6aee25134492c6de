pub use crate::core::{
    CspMode, HeaderSetting, LocaleHostnames, MediaStorage, PolicyFragment, SecurityHeaders,
    SecurityHeadersConfig, SecurityHeadersConfigBuilder, SiteContext,
};
pub use crate::error::SecurityHeadersError;
pub use crate::middleware::{
    configure_security_headers, security_headers_middleware, SecurityHeadersMiddleware,
};
