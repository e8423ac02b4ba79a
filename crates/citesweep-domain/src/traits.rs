//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and infrastructure.
//! Implementations live in other crates.

use crate::citation::RawCitation;
use crate::provider::{ProviderKind, ProviderResponse};
use crate::resolution::ResolutionResult;
use async_trait::async_trait;

/// Trait for issuing a search-augmented query against a backend
///
/// Implemented by the infrastructure layer (citesweep-llm)
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Error type for provider calls
    type Error: std::fmt::Display + Send;

    /// Which backend this provider talks to
    fn kind(&self) -> ProviderKind;

    /// Send a prompt and return the provider-native response
    async fn search(&self, prompt: &str, temperature: f64)
        -> Result<ProviderResponse, Self::Error>;
}

/// Trait for schema-constrained text generation
///
/// Implemented by the infrastructure layer (citesweep-llm)
#[async_trait]
pub trait StructuredOutputProvider: Send + Sync {
    /// Error type for generation calls
    type Error: std::fmt::Display + Send;

    /// Generate a completion constrained to the given JSON schema
    ///
    /// Returns the raw completion text; callers validate it.
    async fn generate_structured(&self, prompt: &str, schema: &str)
        -> Result<String, Self::Error>;
}

/// Trait for turning a provider response into raw citations
///
/// Implemented by the application layer (citesweep-extractor), once for
/// native citation metadata and once for inference over plain text.
#[async_trait]
pub trait CitationExtractor: Send + Sync {
    /// Error type for extraction
    type Error: std::fmt::Display + Send;

    /// Extract every citation-bearing fragment from a response
    async fn extract(&self, response: &ProviderResponse) -> Result<Vec<RawCitation>, Self::Error>;
}

/// Trait for resolving indirection URLs to their destination
///
/// Implemented by the infrastructure layer (citesweep-resolver).
/// Resolution never fails: every problem becomes `ResolutionResult::Unresolved`.
#[async_trait]
pub trait RedirectResolver: Send + Sync {
    /// Resolve a single URL
    async fn resolve(&self, url: &str) -> ResolutionResult;
}

#[async_trait]
impl<T: SearchProvider + ?Sized> SearchProvider for Box<T> {
    type Error = T::Error;

    fn kind(&self) -> ProviderKind {
        (**self).kind()
    }

    async fn search(&self, prompt: &str, temperature: f64)
        -> Result<ProviderResponse, Self::Error>
    {
        (**self).search(prompt, temperature).await
    }
}

#[async_trait]
impl<T: StructuredOutputProvider + ?Sized> StructuredOutputProvider for Box<T> {
    type Error = T::Error;

    async fn generate_structured(&self, prompt: &str, schema: &str)
        -> Result<String, Self::Error>
    {
        (**self).generate_structured(prompt, schema).await
    }
}
