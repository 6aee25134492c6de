use crate::constants::{
    ANALYTICS_FRAGMENT, DEFAULT_SRC, FONT_SRC, FRAME_SRC, GENERAL_FRAGMENT, GOOGLE_FONTS_FRAGMENT,
    OEMBED_FRAGMENT, SCRIPT_SRC, STYLE_SRC,
};
use crate::core::config::Toggle;
use indexmap::IndexMap;
use serde::Deserialize;

/// A partial policy contributed by one feature area.
///
/// Each directive maps to an optional source list. `None` means the fragment
/// contributes nothing to that directive; an empty string registers the
/// directive without sources (e.g. `upgrade-insecure-requests`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "IndexMap<String, Toggle<String>>")]
pub struct PolicyFragment {
    directives: IndexMap<String, Option<String>>,
}

impl PolicyFragment {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, directive: impl Into<String>, sources: impl Into<String>) -> Self {
        self.insert(directive, Some(sources.into()));
        self
    }

    pub fn insert(&mut self, directive: impl Into<String>, sources: Option<String>) -> &mut Self {
        self.directives.insert(directive.into(), sources);
        self
    }

    #[inline]
    pub fn disable(&mut self, directive: &str) -> &mut Self {
        if let Some(sources) = self.directives.get_mut(directive) {
            *sources = None;
        }
        self
    }

    #[inline]
    pub fn get(&self, directive: &str) -> Option<&str> {
        self.directives.get(directive)?.as_deref()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.directives
            .iter()
            .map(|(name, sources)| (name.as_str(), sources.as_deref()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Baseline policy allowing the site's own hosts.
    pub fn general() -> Self {
        Self::new()
            .with(DEFAULT_SRC, "HOSTS")
            .with(STYLE_SRC, "'unsafe-inline' HOSTS")
            .with(SCRIPT_SRC, "'unsafe-inline' 'unsafe-eval' HOSTS")
            .with(FONT_SRC, "HOSTS")
            .with(FRAME_SRC, "'self'")
    }

    pub fn google_fonts() -> Self {
        Self::new()
            .with(STYLE_SRC, "fonts.googleapis.com")
            .with(FONT_SRC, "fonts.gstatic.com")
    }

    pub fn oembed() -> Self {
        Self::new().with(FRAME_SRC, "*.youtube.com *.vimeo.com")
    }

    // Tag manager pulls in scripts from further third parties that need their own fragment.
    pub fn analytics() -> Self {
        Self::new()
            .with(DEFAULT_SRC, "*.google-analytics.com *.doubleclick.net")
            .with(
                SCRIPT_SRC,
                "*.google-analytics.com *.doubleclick.net *.googletagmanager.com",
            )
    }
}

impl From<IndexMap<String, Toggle<String>>> for PolicyFragment {
    fn from(raw: IndexMap<String, Toggle<String>>) -> Self {
        let directives = raw
            .into_iter()
            .map(|(name, value)| {
                let sources = match value {
                    Toggle::Flag(false) | Toggle::Null => None,
                    Toggle::Flag(true) => Some(String::new()),
                    Toggle::Value(sources) if sources.is_empty() => None,
                    Toggle::Value(sources) => Some(sources),
                };
                (name, sources)
            })
            .collect();
        Self { directives }
    }
}

impl<K, V> FromIterator<(K, V)> for PolicyFragment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fragment = Self::new();
        for (directive, sources) in iter {
            fragment.insert(directive, Some(sources.into()));
        }
        fragment
    }
}

/// Ordered, named fragments. A disabled entry keeps its position so that
/// re-enabling it restores the original merge order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentSet {
    fragments: IndexMap<String, Option<PolicyFragment>>,
}

impl FragmentSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_minimum() -> Self {
        let mut set = Self::new();
        set.insert(GENERAL_FRAGMENT, PolicyFragment::general());
        set
    }

    pub fn default_addons() -> Self {
        let mut set = Self::new();
        set.insert(GOOGLE_FONTS_FRAGMENT, PolicyFragment::google_fonts())
            .insert(OEMBED_FRAGMENT, PolicyFragment::oembed())
            .insert(ANALYTICS_FRAGMENT, PolicyFragment::analytics());
        set
    }

    pub fn insert(&mut self, name: impl Into<String>, fragment: PolicyFragment) -> &mut Self {
        self.fragments.insert(name.into(), Some(fragment));
        self
    }

    pub fn disable(&mut self, name: impl Into<String>) -> &mut Self {
        self.fragments.insert(name.into(), None);
        self
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&PolicyFragment> {
        self.fragments.get(name)?.as_ref()
    }

    #[inline]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[inline]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(String::as_str)
    }

    #[inline]
    pub fn enabled(&self) -> impl Iterator<Item = (&str, &PolicyFragment)> {
        self.fragments
            .iter()
            .filter_map(|(name, fragment)| Some((name.as_str(), fragment.as_ref()?)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Entries of `other` replace same-named entries in place; new names are appended.
    pub fn overlay(&mut self, other: &FragmentSet) {
        for (name, fragment) in &other.fragments {
            self.fragments.insert(name.clone(), fragment.clone());
        }
    }

    /// Applies user-supplied entries on top of these defaults. `true` keeps the
    /// default of that name and is an error for names without one.
    pub(crate) fn overlay_toggles(
        &mut self,
        raw: IndexMap<String, Toggle<PolicyFragment>>,
    ) -> Result<(), String> {
        for (name, value) in raw {
            match value {
                Toggle::Flag(false) | Toggle::Null => {
                    self.disable(name);
                }
                Toggle::Flag(true) => {
                    if !self.fragments.contains_key(&name) {
                        return Err(format!(
                            "fragment '{}' has no default to enable; supply its directives",
                            name
                        ));
                    }
                }
                Toggle::Value(fragment) => {
                    self.insert(name, fragment);
                }
            }
        }
        Ok(())
    }
}

impl<K: Into<String>> FromIterator<(K, PolicyFragment)> for FragmentSet {
    fn from_iter<I: IntoIterator<Item = (K, PolicyFragment)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, fragment) in iter {
            set.insert(name, fragment);
        }
        set
    }
}
