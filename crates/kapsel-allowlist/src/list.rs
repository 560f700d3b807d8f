//! Ordered collection of compiled origin patterns.

use crate::pattern::OriginPattern;

/// An ordered, append-only set of origin-access rules.
///
/// Matching is a logical OR over the entries, so insertion order carries
/// no meaning beyond logging. An empty list allows nothing.
///
/// The list is meant to be fully populated during configuration setup and
/// read-only afterwards; `is_allowed` is pure and safe to call from the
/// surface's event thread arbitrarily often. Mutating concurrently with
/// matching is a misuse: in particular the `*` expansion below is two
/// separate appends and a concurrent reader could observe only one.
#[derive(Debug, Clone, Default)]
pub struct Allowlist {
    entries: Vec<OriginPattern>,
}

impl Allowlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an access rule. There is no remove.
    ///
    /// The literal origin `*` is expanded into separate rules for the two
    /// web schemes, so a catch-all entry never lets custom schemes become
    /// in-page navigable.
    pub fn add(&mut self, origin: &str, include_subdomains: bool) {
        if origin.trim() == "*" {
            tracing::debug!("expanding origin * into http://*/* and https://*/*");
            self.entries.push(OriginPattern::compile("http://*/*", include_subdomains));
            self.entries.push(OriginPattern::compile("https://*/*", include_subdomains));
            return;
        }
        tracing::debug!("allowing origin {origin} (subdomains: {include_subdomains})");
        self.entries.push(OriginPattern::compile(origin, include_subdomains));
    }

    /// True iff at least one entry matches the URL.
    pub fn is_allowed(&self, url: &str) -> bool {
        self.entries.iter().any(|pattern| pattern.matches(url))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
