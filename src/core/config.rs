use crate::constants::{DEFAULT_HSTS, DEFAULT_REFERRER_POLICY, DEFAULT_X_FRAME_OPTIONS};
use crate::core::fragment::{FragmentSet, PolicyFragment};
use crate::error::SecurityHeadersError;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::{borrow::Cow, fmt, path::Path};

/// An option that may be switched off with `false` or `null` instead of
/// carrying a value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Toggle<T> {
    Flag(bool),
    Null,
    Value(T),
}

/// A pass-through header: either a fixed value or omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Toggle<String>")]
pub enum HeaderSetting {
    Disabled,
    Value(Cow<'static, str>),
}

impl HeaderSetting {
    #[inline]
    pub fn value(&self) -> Option<&str> {
        match self {
            HeaderSetting::Disabled => None,
            HeaderSetting::Value(value) => Some(value),
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        matches!(self, HeaderSetting::Value(_))
    }
}

impl TryFrom<Toggle<String>> for HeaderSetting {
    type Error = String;

    fn try_from(raw: Toggle<String>) -> Result<Self, Self::Error> {
        match raw {
            Toggle::Flag(false) | Toggle::Null => Ok(HeaderSetting::Disabled),
            Toggle::Value(value) if value.is_empty() => Ok(HeaderSetting::Disabled),
            Toggle::Value(value) => Ok(HeaderSetting::Value(Cow::Owned(value))),
            Toggle::Flag(true) => Err("expected a header value or false, found true".to_owned()),
        }
    }
}

impl From<&'static str> for HeaderSetting {
    fn from(value: &'static str) -> Self {
        HeaderSetting::Value(Cow::Borrowed(value))
    }
}

impl From<String> for HeaderSetting {
    fn from(value: String) -> Self {
        HeaderSetting::Value(Cow::Owned(value))
    }
}

impl<T: Into<HeaderSetting>> From<Option<T>> for HeaderSetting {
    fn from(value: Option<T>) -> Self {
        value.map_or(HeaderSetting::Disabled, Into::into)
    }
}

/// How the Content-Security-Policy header is produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Toggle<String>")]
pub enum CspMode {
    /// Merged from the configured fragments and legitimate hosts.
    #[default]
    Computed,
    /// Sent verbatim; fragments and hosts are ignored.
    Literal(Cow<'static, str>),
    Disabled,
}

impl From<Toggle<String>> for CspMode {
    fn from(raw: Toggle<String>) -> Self {
        match raw {
            Toggle::Flag(true) => CspMode::Computed,
            Toggle::Flag(false) | Toggle::Null => CspMode::Disabled,
            Toggle::Value(value) if value.is_empty() => CspMode::Disabled,
            Toggle::Value(value) => CspMode::Literal(Cow::Owned(value)),
        }
    }
}

impl fmt::Display for CspMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CspMode::Computed => f.write_str("computed"),
            CspMode::Literal(_) => f.write_str("literal"),
            CspMode::Disabled => f.write_str("disabled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SecurityHeadersConfig {
    #[serde(rename = "Strict-Transport-Security")]
    strict_transport_security: HeaderSetting,
    #[serde(rename = "X-Frame-Options")]
    x_frame_options: HeaderSetting,
    #[serde(rename = "Referrer-Policy")]
    referrer_policy: HeaderSetting,
    #[serde(rename = "Permissions-Policy")]
    permissions_policy: HeaderSetting,
    #[serde(rename = "Content-Security-Policy")]
    content_security_policy: CspMode,
    #[serde(rename = "minimumPolicies", deserialize_with = "minimum_policies")]
    minimum_policies: FragmentSet,
    #[serde(rename = "policies", deserialize_with = "addon_policies")]
    policies: FragmentSet,
    #[serde(rename = "legitimateHosts")]
    legitimate_hosts: Option<Vec<String>>,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            // Subdomains may be unrelated sites, so includeSubDomains is left off.
            strict_transport_security: HeaderSetting::from(DEFAULT_HSTS),
            x_frame_options: HeaderSetting::from(DEFAULT_X_FRAME_OPTIONS),
            referrer_policy: HeaderSetting::from(DEFAULT_REFERRER_POLICY),
            permissions_policy: HeaderSetting::Disabled,
            content_security_policy: CspMode::Computed,
            minimum_policies: FragmentSet::default_minimum(),
            policies: FragmentSet::default_addons(),
            legitimate_hosts: None,
        }
    }
}

fn minimum_policies<'de, D>(deserializer: D) -> Result<FragmentSet, D::Error>
where
    D: Deserializer<'de>,
{
    overlay_defaults(deserializer, FragmentSet::default_minimum())
}

fn addon_policies<'de, D>(deserializer: D) -> Result<FragmentSet, D::Error>
where
    D: Deserializer<'de>,
{
    overlay_defaults(deserializer, FragmentSet::default_addons())
}

fn overlay_defaults<'de, D>(
    deserializer: D,
    mut defaults: FragmentSet,
) -> Result<FragmentSet, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<IndexMap<String, Toggle<PolicyFragment>>>::deserialize(deserializer)?;
    if let Some(raw) = raw {
        defaults
            .overlay_toggles(raw)
            .map_err(serde::de::Error::custom)?;
    }
    Ok(defaults)
}

impl SecurityHeadersConfig {
    #[inline]
    pub fn builder() -> SecurityHeadersConfigBuilder {
        SecurityHeadersConfigBuilder::new()
    }

    pub fn from_json_str(json: &str) -> Result<Self, SecurityHeadersError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SecurityHeadersError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded security headers config from {}", path.as_ref().display());
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), SecurityHeadersError> {
        if let Some(hosts) = &self.legitimate_hosts {
            for host in hosts {
                if host.is_empty() || host.contains(char::is_whitespace) {
                    return Err(SecurityHeadersError::ConfigError(format!(
                        "legitimateHosts entry {:?} must be a single non-empty token",
                        host
                    )));
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn strict_transport_security(&self) -> &HeaderSetting {
        &self.strict_transport_security
    }

    #[inline]
    pub fn x_frame_options(&self) -> &HeaderSetting {
        &self.x_frame_options
    }

    #[inline]
    pub fn referrer_policy(&self) -> &HeaderSetting {
        &self.referrer_policy
    }

    #[inline]
    pub fn permissions_policy(&self) -> &HeaderSetting {
        &self.permissions_policy
    }

    #[inline]
    pub fn content_security_policy(&self) -> &CspMode {
        &self.content_security_policy
    }

    #[inline]
    pub fn minimum_policies(&self) -> &FragmentSet {
        &self.minimum_policies
    }

    #[inline]
    pub fn policies(&self) -> &FragmentSet {
        &self.policies
    }

    #[inline]
    pub fn legitimate_hosts(&self) -> Option<&[String]> {
        self.legitimate_hosts.as_deref()
    }

    /// All fragments in merge order: minimum policies first, then add-ons.
    /// An add-on sharing a name with a minimum policy replaces it in place.
    pub fn fragments(&self) -> FragmentSet {
        let mut fragments = self.minimum_policies.clone();
        fragments.overlay(&self.policies);
        fragments
    }
}

#[derive(Debug, Default)]
pub struct SecurityHeadersConfigBuilder {
    config: SecurityHeadersConfig,
}

impl SecurityHeadersConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn strict_transport_security(mut self, setting: impl Into<HeaderSetting>) -> Self {
        self.config.strict_transport_security = setting.into();
        self
    }

    #[inline]
    pub fn x_frame_options(mut self, setting: impl Into<HeaderSetting>) -> Self {
        self.config.x_frame_options = setting.into();
        self
    }

    #[inline]
    pub fn referrer_policy(mut self, setting: impl Into<HeaderSetting>) -> Self {
        self.config.referrer_policy = setting.into();
        self
    }

    #[inline]
    pub fn permissions_policy(mut self, setting: impl Into<HeaderSetting>) -> Self {
        self.config.permissions_policy = setting.into();
        self
    }

    #[inline]
    pub fn content_security_policy(mut self, mode: CspMode) -> Self {
        self.config.content_security_policy = mode;
        self
    }

    pub fn minimum_policy(mut self, name: impl Into<String>, fragment: PolicyFragment) -> Self {
        self.config.minimum_policies.insert(name, fragment);
        self
    }

    pub fn disable_minimum_policy(mut self, name: impl Into<String>) -> Self {
        self.config.minimum_policies.disable(name);
        self
    }

    pub fn policy(mut self, name: impl Into<String>, fragment: PolicyFragment) -> Self {
        self.config.policies.insert(name, fragment);
        self
    }

    pub fn disable_policy(mut self, name: impl Into<String>) -> Self {
        self.config.policies.disable(name);
        self
    }

    /// Drops the bundled add-on fragments, keeping only the minimum policies.
    pub fn without_default_policies(mut self) -> Self {
        self.config.policies = FragmentSet::new();
        self
    }

    pub fn legitimate_hosts(
        mut self,
        hosts: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.config.legitimate_hosts = Some(hosts.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<SecurityHeadersConfig, SecurityHeadersError> {
        self.config.validate()?;
        Ok(self.config)
    }

    #[inline]
    pub fn build_unchecked(self) -> SecurityHeadersConfig {
        self.config
    }
}
