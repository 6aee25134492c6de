use indexmap::IndexMap;
use serde::Deserialize;

/// Storage backend for uploaded media. The URL may be relative (served by the
/// site itself) or absolute (a CDN or bucket host).
pub trait MediaStorage {
    fn url(&self) -> String;
}

impl MediaStorage for String {
    fn url(&self) -> String {
        self.clone()
    }
}

impl MediaStorage for &'static str {
    fn url(&self) -> String {
        (*self).to_owned()
    }
}

/// Hostname settings of a multi-site / localization layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocaleHostnames {
    /// Locale name to hostname.
    pub hostnames: IndexMap<String, String>,
    /// Hostname to its default locale.
    pub default_locales_by_hostname: IndexMap<String, String>,
}

impl LocaleHostnames {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hostname(mut self, locale: impl Into<String>, hostname: impl Into<String>) -> Self {
        self.hostnames.insert(locale.into(), hostname.into());
        self
    }

    pub fn default_locale(
        mut self,
        hostname: impl Into<String>,
        locale: impl Into<String>,
    ) -> Self {
        self.default_locales_by_hostname
            .insert(hostname.into(), locale.into());
        self
    }

    /// Per-locale hostnames followed by the default-locale hostname keys.
    pub fn all_hostnames(&self) -> impl Iterator<Item = &str> {
        self.hostnames
            .values()
            .chain(self.default_locales_by_hostname.keys())
            .map(String::as_str)
    }
}

/// Already-loaded site state consulted during host discovery.
#[derive(Default, Clone, Copy)]
pub struct SiteContext<'a> {
    base_url: Option<&'a str>,
    locales: Option<&'a LocaleHostnames>,
    media: Option<&'a dyn MediaStorage>,
}

impl<'a> SiteContext<'a> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn base_url(mut self, base_url: &'a str) -> Self {
        self.base_url = Some(base_url);
        self
    }

    #[inline]
    pub fn locales(mut self, locales: &'a LocaleHostnames) -> Self {
        self.locales = Some(locales);
        self
    }

    #[inline]
    pub fn media_storage(mut self, media: &'a dyn MediaStorage) -> Self {
        self.media = Some(media);
        self
    }

    #[inline]
    pub fn get_base_url(&self) -> Option<&'a str> {
        self.base_url
    }

    #[inline]
    pub fn get_locales(&self) -> Option<&'a LocaleHostnames> {
        self.locales
    }

    #[inline]
    pub fn get_media_storage(&self) -> Option<&'a dyn MediaStorage> {
        self.media
    }
}

impl std::fmt::Debug for SiteContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteContext")
            .field("base_url", &self.base_url)
            .field("locales", &self.locales)
            .field("media_storage", &self.media.is_some())
            .finish()
    }
}
