//! Citation module - raw provider fragments and their canonical form

use crate::resolution::ResolutionResult;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A provider-native citation fragment
///
/// Either a direct URL or the name of an outlet, publication or institution.
/// It has no identity beyond its (trimmed) text value.
///
/// # Examples
///
/// ```
/// use citesweep_domain::RawCitation;
///
/// let url = RawCitation::new("https://example.com/a").unwrap();
/// assert!(url.is_url());
///
/// let outlet = RawCitation::new("Reuters").unwrap();
/// assert!(!outlet.is_url());
///
/// assert!(RawCitation::new("   ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawCitation(String);

impl RawCitation {
    /// Create a raw citation, trimming whitespace
    ///
    /// Returns `None` for empty text so that an empty citation can never
    /// enter the pipeline.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Get the citation text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the citation and return its text
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether the citation looks like an http(s) URL rather than a name
    pub fn is_url(&self) -> bool {
        let lower = self.0.to_ascii_lowercase();
        (lower.starts_with("http://") || lower.starts_with("https://"))
            && !self.0.contains(char::is_whitespace)
    }
}

impl fmt::Display for RawCitation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized citation persisted for a query record
///
/// Equality and hashing consider only `source_url_or_name`, so a set of
/// canonical citations never holds the same source twice.
#[derive(Debug, Clone)]
pub struct CanonicalCitation {
    /// Final URL (after resolution) or outlet name. Never empty.
    pub source_url_or_name: String,

    /// True when the resolver returned `Resolved` or the source is a name
    pub resolved: bool,
}

impl CanonicalCitation {
    /// A citation that needed no resolution or was resolved successfully
    pub fn resolved(source: impl Into<String>) -> Self {
        Self {
            source_url_or_name: source.into(),
            resolved: true,
        }
    }

    /// A citation whose URL could not be resolved
    pub fn unresolved(source: impl Into<String>) -> Self {
        Self {
            source_url_or_name: source.into(),
            resolved: false,
        }
    }

    /// Outlet names have nothing to resolve and are always `resolved`
    pub fn outlet(raw: &RawCitation) -> Self {
        Self::resolved(raw.as_str())
    }

    /// Build the canonical form of a resolution outcome
    ///
    /// `Unresolved` keeps the original URL so the citation is never dropped.
    pub fn from_resolution(result: &ResolutionResult) -> Self {
        match result {
            ResolutionResult::Resolved(final_url) => Self::resolved(final_url.clone()),
            ResolutionResult::Unresolved { original_url, .. } => {
                Self::unresolved(original_url.clone())
            }
        }
    }
}

impl PartialEq for CanonicalCitation {
    fn eq(&self, other: &Self) -> bool {
        self.source_url_or_name == other.source_url_or_name
    }
}

impl Eq for CanonicalCitation {}

impl Hash for CanonicalCitation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source_url_or_name.hash(state);
    }
}

/// Deduplicate canonical citations by source, keeping first-seen order
///
/// Entries with an empty source are discarded.
pub fn dedup_citations<I>(citations: I) -> Vec<CanonicalCitation>
where
    I: IntoIterator<Item = CanonicalCitation>,
{
    let mut seen = HashSet::new();
    citations
        .into_iter()
        .filter(|c| !c.source_url_or_name.is_empty())
        .filter(|c| seen.insert(c.source_url_or_name.clone()))
        .collect()
}

/// Deduplicate raw citations by text, keeping first-seen order
pub fn dedup_raw<I>(citations: I) -> Vec<RawCitation>
where
    I: IntoIterator<Item = RawCitation>,
{
    let mut seen = HashSet::new();
    citations
        .into_iter()
        .filter(|c| seen.insert(c.0.clone()))
        .collect()
}
