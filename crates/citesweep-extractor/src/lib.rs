//! citesweep Extractor
//!
//! Turns provider responses into raw citations.
//!
//! # Overview
//!
//! Two implementations of the `CitationExtractor` capability:
//!
//! - [`NativeCitationExtractor`] walks the provider's own citation metadata
//!   (inline citations, grounding chunks, `url_citation` annotations)
//! - [`InferenceExtractor`] asks a structured-output model to list the
//!   outlets an answer names, for providers that return plain text
//!
//! [`ResponseExtractor`] routes each response to the right one.
//!
//! # Architecture
//!
//! ```text
//! ProviderResponse ─┬─ JSON ─→ NativeCitationExtractor ─┐
//!                   └─ text ─→ InferenceExtractor ──────┴→ Vec<RawCitation>
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use citesweep_extractor::{ExtractorConfig, InferenceExtractor};
//! use citesweep_llm::MockProvider;
//!
//! # async fn example() {
//! let llm = MockProvider::new(r#"{"citations": ["CNN"]}"#);
//! let extractor = InferenceExtractor::new(llm, ExtractorConfig::default());
//!
//! let citations = extractor.infer("According to CNN, ...").await;
//! assert_eq!(citations[0].source_url_or_name, "CNN");
//! # }
//! ```

#![warn(missing_docs)]

mod adapter;
mod config;
mod dispatch;
mod error;
pub mod evaluation;
mod inference;
mod parser;
mod prompt;

pub use adapter::NativeCitationExtractor;
pub use config::ExtractorConfig;
pub use dispatch::{Extraction, ResponseExtractor};
pub use error::ExtractorError;
pub use evaluation::{evaluate, CaseOutcome, EvaluationCase, EvaluationReport, EVALUATION_CASES};
pub use inference::{response_text, InferenceExtractor};
pub use parser::parse_citation_list;
pub use prompt::{PromptBuilder, CITATION_SCHEMA};
