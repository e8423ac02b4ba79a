//! citesweep Domain Layer
//!
//! Core model and capability interfaces for the citation sweep pipeline.
//!
//! ## Key Concepts
//!
//! - **RawCitation**: A provider-native citation fragment (URL or outlet name)
//! - **CanonicalCitation**: The normalized, deduplicated unit persisted per call
//! - **ResolutionResult**: Outcome of resolving one indirection URL
//! - **QueryRecord**: One finished sweep cell
//! - **SweepCell**: One (provider, prompt, temperature, iteration) combination
//!
//! ## Architecture
//!
//! Infrastructure lives in other crates. This crate only defines the data model
//! and the traits those crates implement:
//!
//! - [`traits::SearchProvider`] issues a search-augmented query
//! - [`traits::StructuredOutputProvider`] runs a schema-constrained completion
//! - [`traits::CitationExtractor`] turns a provider response into raw citations
//! - [`traits::RedirectResolver`] resolves indirection URLs

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod citation;
pub mod provider;
pub mod record;
pub mod resolution;
pub mod traits;

// Re-exports for convenience
pub use citation::{dedup_citations, dedup_raw, CanonicalCitation, RawCitation};
pub use provider::{ProviderKind, ProviderResponse, ResponseBody};
pub use record::{CellState, PromptSpec, QueryRecord, SweepCell};
pub use resolution::{ResolutionResult, UnresolvedReason};
