use crate::constants::{DEFAULT_BUFFER_CAPACITY, HOSTS_PLACEHOLDER, SEMICOLON_SPACE};
use crate::core::fragment::PolicyFragment;
use crate::core::hosts::HostSet;
use crate::error::SecurityHeadersError;
use indexmap::IndexMap;
use smallvec::SmallVec;

/// Directive-by-directive union of policy fragments.
///
/// Directives keep the order in which they were first seen across all
/// fragments, and each directive's tokens keep first-seen order without
/// repeats. Browsers honour only one instance of a directive, so fragments
/// widen a shared directive instead of emitting it twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedPolicy {
    directives: IndexMap<String, SmallVec<[String; 4]>>,
}

impl MergedPolicy {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fragments<'f, I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = &'f PolicyFragment>,
    {
        let mut merged = Self::new();
        for fragment in fragments {
            merged.merge(fragment);
        }
        merged
    }

    pub fn merge(&mut self, fragment: &PolicyFragment) -> &mut Self {
        for (directive, sources) in fragment.iter() {
            let Some(sources) = sources else {
                continue;
            };

            let tokens = self.directives.entry(directive.to_owned()).or_default();
            // Linear scan: directives hold a handful of tokens.
            for token in sources.split_whitespace() {
                if !tokens.iter().any(|existing| existing == token) {
                    tokens.push(token.to_owned());
                }
            }
        }
        self
    }

    #[inline]
    pub fn directive(&self, name: &str) -> Option<&[String]> {
        self.directives.get(name).map(SmallVec::as_slice)
    }

    #[inline]
    pub fn directives(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.directives
            .iter()
            .map(|(name, tokens)| (name.as_str(), tokens.as_slice()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    fn estimated_size(&self) -> usize {
        self.directives
            .iter()
            .map(|(name, tokens)| {
                let tokens_len: usize = tokens.iter().map(|t| t.len() + 1).sum();
                name.len() + tokens_len + SEMICOLON_SPACE.len()
            })
            .sum()
    }

    /// Serializes the policy with the `HOSTS` placeholder still in place.
    pub fn render(&self) -> String {
        let capacity = self.estimated_size().max(DEFAULT_BUFFER_CAPACITY);
        let mut buffer = String::with_capacity(capacity);
        for (name, tokens) in &self.directives {
            if !buffer.is_empty() {
                buffer.push_str(SEMICOLON_SPACE);
            }
            buffer.push_str(name);
            for token in tokens {
                buffer.push(' ');
                buffer.push_str(token);
            }
        }
        buffer
    }

    /// Serializes the policy and substitutes every `HOSTS` occurrence with the
    /// host list. Fails rather than emitting the placeholder when `hosts` is empty.
    /// Substitution runs after token deduplication, so a host already listed
    /// beside `HOSTS` is repeated in the output.
    pub fn render_with_hosts(&self, hosts: &HostSet) -> Result<String, SecurityHeadersError> {
        let provisional = self.render();
        if !provisional.contains(HOSTS_PLACEHOLDER) {
            return Ok(provisional);
        }
        if hosts.is_empty() {
            return Err(SecurityHeadersError::EmptyHostSet);
        }
        Ok(provisional.replace(HOSTS_PLACEHOLDER, &hosts.source_list()))
    }
}

/// Merges `fragments` in order and renders the final header value.
pub fn build_csp_header<'f, I>(
    fragments: I,
    hosts: &HostSet,
) -> Result<String, SecurityHeadersError>
where
    I: IntoIterator<Item = &'f PolicyFragment>,
{
    let merged = MergedPolicy::from_fragments(fragments);
    log::debug!("Merged {} Content-Security-Policy directives", merged.len());
    merged.render_with_hosts(hosts)
}
