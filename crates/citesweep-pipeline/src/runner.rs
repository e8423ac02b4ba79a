//! Sequential sweep runner
//!
//! One logical worker walks the plan in order. Cancellation is checked
//! between cells, so an interrupt lets the current cell finish and the run
//! returns everything gathered so far.

use crate::cell::{process_cell, CellOutcome};
use crate::error::PipelineError;
use crate::metrics::SweepMetrics;
use crate::normalizer::CitationNormalizer;
use crate::plan::SweepPlan;
use citesweep_domain::traits::{RedirectResolver, SearchProvider, StructuredOutputProvider};
use citesweep_domain::{CellState, ProviderKind, QueryRecord, SweepCell};
use citesweep_extractor::ResponseExtractor;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Hooks called while a sweep runs
///
/// All methods default to doing nothing.
pub trait SweepObserver {
    /// Called once before the first cell
    fn on_start(&mut self, _plan: &SweepPlan) {}

    /// Called before a cell is dispatched; `index` is 0-based
    fn on_cell_start(&mut self, _index: usize, _total: usize, _cell: &SweepCell) {}

    /// Called after a cell reached a terminal state
    fn on_cell_finish(&mut self, _index: usize, _total: usize, _outcome: &CellOutcome) {}

    /// Called once when the run ends, cancelled or not
    fn on_finish(&mut self, _report: &SweepReport) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SweepObserver for NoopObserver {}

/// What a sweep produced
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Records in plan order, failed cells included
    pub records: Vec<QueryRecord>,

    /// Aggregated counters
    pub metrics: SweepMetrics,

    /// True when the run stopped before the plan was exhausted
    pub cancelled: bool,
}

impl SweepReport {
    /// Records whose provider call succeeded
    pub fn succeeded(&self) -> impl Iterator<Item = &QueryRecord> {
        self.records.iter().filter(|r| r.succeeded)
    }
}

/// Runs a sweep plan against a set of providers
pub struct SweepRunner<P, X, R> {
    providers: Vec<P>,
    extractor: ResponseExtractor<X>,
    normalizer: CitationNormalizer<R>,
}

impl<P, X, R> SweepRunner<P, X, R>
where
    P: SearchProvider,
    X: StructuredOutputProvider,
    R: RedirectResolver,
{
    /// Create a runner
    pub fn new(
        providers: Vec<P>,
        extractor: ResponseExtractor<X>,
        normalizer: CitationNormalizer<R>,
    ) -> Self {
        Self {
            providers,
            extractor,
            normalizer,
        }
    }

    /// Kinds of the configured providers, in configuration order
    pub fn provider_kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    /// Get the normalizer
    pub fn normalizer(&self) -> &CitationNormalizer<R> {
        &self.normalizer
    }

    fn provider(&self, kind: ProviderKind) -> Option<&P> {
        self.providers.iter().find(|p| p.kind() == kind)
    }

    async fn run_cell(&self, cell: &SweepCell) -> CellOutcome {
        let outcome = match self.provider(cell.provider) {
            Some(provider) => {
                process_cell(cell, provider, &self.extractor, &self.normalizer).await
            }
            None => Err(PipelineError::MissingProvider(cell.provider.to_string())),
        };

        outcome.unwrap_or_else(|e| {
            error!(provider = %cell.provider, "cell aborted: {}", e);
            CellOutcome {
                record: QueryRecord::failure(cell),
                state: CellState::Failed(e.to_string()),
                extraction_error: None,
            }
        })
    }

    /// Run every cell of `plan` until done or `cancel` fires
    pub async fn run<O>(
        &self,
        plan: &SweepPlan,
        observer: &mut O,
        cancel: &CancellationToken,
    ) -> SweepReport
    where
        O: SweepObserver + ?Sized,
    {
        let started = Instant::now();
        let total = plan.len();
        let mut report = SweepReport::default();

        info!(cells = total, providers = self.providers.len(), "sweep started");
        observer.on_start(plan);

        for (index, cell) in plan.cells().iter().enumerate() {
            if cancel.is_cancelled() {
                info!(completed = index, total, "sweep cancelled");
                report.cancelled = true;
                break;
            }

            debug!(
                provider = %cell.provider,
                temperature = cell.temperature,
                iteration = cell.iteration,
                "cell {}/{}",
                index + 1,
                total
            );
            observer.on_cell_start(index, total, cell);

            let outcome = self.run_cell(cell).await;
            report.metrics.record(&outcome);
            observer.on_cell_finish(index, total, &outcome);
            report.records.push(outcome.record);
        }

        report.metrics.total_runtime_secs = started.elapsed().as_secs();
        info!(
            "Sweep finished: {} ok, {} failed, {} citations",
            report.metrics.succeeded, report.metrics.failed, report.metrics.citations
        );
        observer.on_finish(&report);
        report
    }
}
