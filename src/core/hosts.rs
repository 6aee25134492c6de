use crate::constants::SELF_SOURCE;
use crate::core::config::SecurityHeadersConfig;
use crate::core::site::SiteContext;
use crate::error::SecurityHeadersError;
use indexmap::IndexSet;
use rustc_hash::FxHasher;
use std::{fmt, hash::BuildHasherDefault};
use url::Url;

type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;

/// Hosts a site may reference, substituted for `HOSTS` in the policy.
///
/// Keeps insertion order for stable output; equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSet {
    hosts: FxIndexSet<String>,
}

impl HostSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the host was already present.
    #[inline]
    pub fn insert(&mut self, host: impl Into<String>) -> bool {
        self.hosts.insert(host.into())
    }

    #[inline]
    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Space-separated source list.
    pub fn source_list(&self) -> String {
        let capacity = self.hosts.iter().map(|h| h.len() + 1).sum();
        let mut list = String::with_capacity(capacity);
        for host in &self.hosts {
            if !list.is_empty() {
                list.push(' ');
            }
            list.push_str(host);
        }
        list
    }
}

impl fmt::Display for HostSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source_list())
    }
}

impl<S: Into<String>> FromIterator<S> for HostSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<String>> Extend<S> for HostSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for host in iter {
            self.insert(host);
        }
    }
}

pub struct HostResolver<'a> {
    overrides: Option<&'a [String]>,
    site: SiteContext<'a>,
}

impl<'a> HostResolver<'a> {
    #[inline]
    pub fn new(site: SiteContext<'a>) -> Self {
        Self {
            overrides: None,
            site,
        }
    }

    #[inline]
    pub fn from_config(config: &'a SecurityHeadersConfig, site: SiteContext<'a>) -> Self {
        Self::new(site).with_overrides(config.legitimate_hosts())
    }

    /// An override list replaces discovery entirely; `'self'` is not added to it.
    #[inline]
    pub fn with_overrides(mut self, hosts: Option<&'a [String]>) -> Self {
        self.overrides = hosts;
        self
    }

    pub fn resolve(&self) -> Result<HostSet, SecurityHeadersError> {
        if let Some(overrides) = self.overrides {
            let hosts: HostSet = overrides.iter().map(String::as_str).collect();
            if !hosts.contains(SELF_SOURCE) {
                log::warn!(
                    "legitimateHosts override [{}] does not include {}",
                    hosts,
                    SELF_SOURCE
                );
            }
            return Ok(hosts);
        }

        let mut hosts = HostSet::new();

        if let Some(base_url) = self.site.get_base_url() {
            hosts.insert(hostname_of(base_url, "base")?);
        }

        if let Some(locales) = self.site.get_locales() {
            hosts.extend(locales.all_hostnames());
        }

        if let Some(media) = self.site.get_media_storage() {
            let media_url = media.url();
            if is_absolute_url(&media_url) {
                hosts.insert(hostname_of(&media_url, "media")?);
            } else {
                log::debug!("Media URL {:?} is local, no host added", media_url);
            }
        }

        hosts.insert(SELF_SOURCE);

        log::debug!("Resolved legitimate hosts: {}", hosts);
        Ok(hosts)
    }
}

#[inline]
pub fn resolve_hosts(
    config: &SecurityHeadersConfig,
    site: SiteContext<'_>,
) -> Result<HostSet, SecurityHeadersError> {
    HostResolver::from_config(config, site).resolve()
}

/// Extracts the host component of an absolute or protocol-relative URL.
#[inline]
pub fn parse_hostname(url: &str) -> Result<String, SecurityHeadersError> {
    hostname_of(url, "site")
}

/// True for protocol-relative URLs and URLs whose scheme separator comes
/// before any path, query or fragment.
fn is_absolute_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    match url.find("://") {
        Some(scheme_end) => !url[..scheme_end].contains(|c: char| matches!(c, '/' | '?' | '#')),
        None => false,
    }
}

fn hostname_of(url: &str, origin: &'static str) -> Result<String, SecurityHeadersError> {
    let parsed = if url.starts_with("//") {
        Url::parse(&format!("https:{}", url))
    } else {
        Url::parse(url)
    }
    .map_err(|source| SecurityHeadersError::InvalidUrl {
        origin,
        url: url.to_owned(),
        source,
    })?;

    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| SecurityHeadersError::MissingHost {
            origin,
            url: url.to_owned(),
        })
}
