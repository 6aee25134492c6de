use crate::constants::{
    HEADER_CSP, HEADER_HSTS, HEADER_PERMISSIONS_POLICY, HEADER_REFERRER_POLICY,
    HEADER_X_CONTENT_TYPE_OPTIONS, HEADER_X_FRAME_OPTIONS, NOSNIFF,
};
use crate::core::config::{CspMode, HeaderSetting, SecurityHeadersConfig};
use crate::core::hosts::resolve_hosts;
use crate::core::merge::build_csp_header;
use crate::core::site::SiteContext;
use crate::error::SecurityHeadersError;
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};

/// The finished header set, computed once at startup and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityHeaders {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl SecurityHeaders {
    pub fn compute(
        config: &SecurityHeadersConfig,
        site: SiteContext<'_>,
    ) -> Result<Self, SecurityHeadersError> {
        let mut headers = Self::default();

        headers.push_setting(HEADER_HSTS, config.strict_transport_security())?;
        headers.push_setting(HEADER_X_FRAME_OPTIONS, config.x_frame_options())?;
        headers.push(HEADER_X_CONTENT_TYPE_OPTIONS, NOSNIFF.to_owned())?;
        headers.push_setting(HEADER_REFERRER_POLICY, config.referrer_policy())?;
        headers.push_setting(HEADER_PERMISSIONS_POLICY, config.permissions_policy())?;

        match config.content_security_policy() {
            CspMode::Computed => {
                let hosts = resolve_hosts(config, site)?;
                let fragments = config.fragments();
                let policy = build_csp_header(fragments.enabled().map(|(_, f)| f), &hosts)?;
                headers.push(HEADER_CSP, policy)?;
            }
            CspMode::Literal(policy) => {
                headers.push(HEADER_CSP, policy.to_string())?;
            }
            CspMode::Disabled => {}
        }

        log::info!(
            "Computed {} security headers (Content-Security-Policy {})",
            headers.len(),
            config.content_security_policy()
        );
        Ok(headers)
    }

    fn push_setting(
        &mut self,
        name: &'static str,
        setting: &HeaderSetting,
    ) -> Result<(), SecurityHeadersError> {
        match setting.value() {
            Some(value) => self.push(name, value.to_owned()),
            None => Ok(()),
        }
    }

    fn push(&mut self, name: &'static str, value: String) -> Result<(), SecurityHeadersError> {
        let header_value = HeaderValue::from_str(&value).map_err(|_| {
            SecurityHeadersError::InvalidHeaderValue {
                header: name,
                value,
            }
        })?;
        self.headers
            .push((HeaderName::from_static(name), header_value));
        Ok(())
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|(header, _)| header.as_str().eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    #[inline]
    pub fn content_security_policy(&self) -> Option<&str> {
        self.get(HEADER_CSP)?.to_str().ok()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.headers.iter().map(|(name, value)| (name, value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Writes every header not already present in `target`.
    pub fn apply_to(&self, target: &mut HeaderMap) {
        for (name, value) in &self.headers {
            if !target.contains_key(name) {
                target.insert(name.clone(), value.clone());
            }
        }
    }
}
