//! Citation Normalizer
//!
//! The only place the redirect resolver is called from. URLs are resolved
//! concurrently (the resolver bounds its own browser sessions); the output
//! keeps the order in which raw citations were first seen.

use citesweep_domain::traits::RedirectResolver;
use citesweep_domain::{dedup_citations, dedup_raw, CanonicalCitation, RawCitation};
use futures::future::join_all;
use tracing::debug;

/// Merges raw citations into the canonical list for one record
pub struct CitationNormalizer<R> {
    resolver: R,
}

impl<R: RedirectResolver> CitationNormalizer<R> {
    /// Create a normalizer backed by `resolver`
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Get the resolver
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Resolve URLs, pass outlet names through and deduplicate
    ///
    /// Unresolved URLs are kept with `resolved = false`. Two raw URLs that
    /// resolve to the same destination collapse into one entry.
    pub async fn normalize<I>(&self, raw: I) -> Vec<CanonicalCitation>
    where
        I: IntoIterator<Item = RawCitation>,
    {
        let raw = dedup_raw(raw);
        let canonical = join_all(raw.iter().map(|citation| self.canonicalize(citation))).await;
        let citations = dedup_citations(canonical);
        debug!(raw = raw.len(), canonical = citations.len(), "citations normalized");
        citations
    }

    async fn canonicalize(&self, citation: &RawCitation) -> CanonicalCitation {
        if citation.is_url() {
            CanonicalCitation::from_resolution(&self.resolver.resolve(citation.as_str()).await)
        } else {
            CanonicalCitation::outlet(citation)
        }
    }
}
