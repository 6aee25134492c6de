pub(crate) const HEADER_HSTS: &str = "strict-transport-security";
pub(crate) const HEADER_X_FRAME_OPTIONS: &str = "x-frame-options";
pub(crate) const HEADER_X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
pub(crate) const HEADER_REFERRER_POLICY: &str = "referrer-policy";
pub(crate) const HEADER_PERMISSIONS_POLICY: &str = "permissions-policy";
pub(crate) const HEADER_CSP: &str = "content-security-policy";

pub(crate) const DEFAULT_HSTS: &str = "max-age=31536000";
pub(crate) const DEFAULT_X_FRAME_OPTIONS: &str = "SAMEORIGIN";
pub(crate) const DEFAULT_REFERRER_POLICY: &str = "same-origin";
pub(crate) const NOSNIFF: &str = "nosniff";

/// Placeholder token replaced by the legitimate host list.
pub const HOSTS_PLACEHOLDER: &str = "HOSTS";
pub const SELF_SOURCE: &str = "'self'";

pub(crate) const DEFAULT_SRC: &str = "default-src";
pub(crate) const SCRIPT_SRC: &str = "script-src";
pub(crate) const STYLE_SRC: &str = "style-src";
pub(crate) const FONT_SRC: &str = "font-src";
pub(crate) const FRAME_SRC: &str = "frame-src";

pub(crate) const GENERAL_FRAGMENT: &str = "general";
pub(crate) const GOOGLE_FONTS_FRAGMENT: &str = "googleFonts";
pub(crate) const OEMBED_FRAGMENT: &str = "oembed";
pub(crate) const ANALYTICS_FRAGMENT: &str = "analytics";

pub(crate) const SEMICOLON_SPACE: &str = "; ";
pub(crate) const DEFAULT_BUFFER_CAPACITY: usize = 256;
