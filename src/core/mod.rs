pub mod config;
pub mod fragment;
pub mod headers;
pub mod hosts;
pub mod merge;
pub mod site;

pub use config::{
    CspMode, HeaderSetting, SecurityHeadersConfig, SecurityHeadersConfigBuilder, Toggle,
};
pub use fragment::{FragmentSet, PolicyFragment};
pub use headers::SecurityHeaders;
pub use hosts::{parse_hostname, resolve_hosts, HostResolver, HostSet};
pub use merge::{build_csp_header, MergedPolicy};
pub use site::{LocaleHostnames, MediaStorage, SiteContext};
