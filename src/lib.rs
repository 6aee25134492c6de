pub mod constants;
pub mod core;
pub mod error;
pub mod middleware;
pub mod prelude;

// Re-export commonly used types for convenience
pub use self::core::{
    build_csp_header, parse_hostname, resolve_hosts, CspMode, FragmentSet, HeaderSetting,
    HostResolver, HostSet, LocaleHostnames, MediaStorage, MergedPolicy, PolicyFragment,
    SecurityHeaders, SecurityHeadersConfig, SecurityHeadersConfigBuilder, SiteContext,
};
pub use error::SecurityHeadersError;
pub use middleware::{
    configure_security_headers, security_headers_middleware, SecurityHeadersMiddleware,
    SecurityHeadersMiddlewareService,
};
