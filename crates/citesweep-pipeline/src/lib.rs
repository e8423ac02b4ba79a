//! citesweep Pipeline
//!
//! Drives a sweep: builds the combinatorial plan, runs each cell through
//! search, extraction and normalization, and collects the records.
//!
//! # Architecture
//!
//! ```text
//! PromptCatalog ─→ SweepPlan ─→ SweepRunner ─┬─ SearchProvider
//!                                            ├─ ResponseExtractor
//!                                            └─ CitationNormalizer ─→ RedirectResolver
//! ```
//!
//! # Example
//!
//! ```no_run
//! use citesweep_pipeline::{
//!     flatten_catalog, CitationNormalizer, NoopObserver, PromptCatalog, SweepConfig, SweepPlan,
//!     SweepRunner,
//! };
//! use citesweep_extractor::{ExtractorConfig, InferenceExtractor, ResponseExtractor};
//! use citesweep_llm::{MockProvider, MockSearchProvider};
//! use citesweep_domain::{ProviderKind, ProviderResponse};
//! use citesweep_resolver::{BrowserRedirectResolver, ChromiumLauncher, ResolverConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(catalog: PromptCatalog) -> Result<(), Box<dyn std::error::Error>> {
//! let resolver_config = ResolverConfig::default();
//! let resolver = BrowserRedirectResolver::new(ChromiumLauncher::new(&resolver_config), resolver_config)?;
//! let provider = MockSearchProvider::new(ProviderResponse::text(ProviderKind::Ollama, "..."));
//! let extractor = ResponseExtractor::new(InferenceExtractor::new(
//!     MockProvider::default(),
//!     ExtractorConfig::default(),
//! ));
//!
//! let runner = SweepRunner::new(vec![provider], extractor, CitationNormalizer::new(resolver));
//! let config = SweepConfig::default();
//! let prompts = flatten_catalog(&catalog, config.top_n);
//! let plan = SweepPlan::new(&runner.provider_kinds(), &prompts, &config);
//!
//! let report = runner.run(&plan, &mut NoopObserver, &CancellationToken::new()).await;
//! println!("{}", report.metrics.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod cell;
mod config;
mod error;
mod metrics;
mod normalizer;
mod plan;
mod runner;

pub use cell::{process_cell, CellMachine, CellOutcome};
pub use config::SweepConfig;
pub use error::PipelineError;
pub use metrics::{ProviderTally, SweepMetrics};
pub use normalizer::CitationNormalizer;
pub use plan::{flatten_catalog, PromptCatalog, PromptItem, SweepPlan};
pub use runner::{NoopObserver, SweepObserver, SweepReport, SweepRunner};
