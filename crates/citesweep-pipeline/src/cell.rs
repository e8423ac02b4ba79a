//! Per-cell state machine
//!
//! ```text
//! Dispatched ──search ok──→ Extracted ──normalize──→ Normalized ──→ Recorded
//!     └──search failed──→ Failed
//! ```
//!
//! Extraction and resolution problems never fail a cell: they degrade to
//! fewer (or unresolved) citations.

use crate::error::PipelineError;
use crate::normalizer::CitationNormalizer;
use citesweep_domain::traits::{RedirectResolver, SearchProvider, StructuredOutputProvider};
use citesweep_domain::{CellState, QueryRecord, SweepCell};
use citesweep_extractor::{response_text, ResponseExtractor};
use tracing::{debug, warn};

/// Tracks one cell through its legal transitions
#[derive(Debug, Clone, PartialEq)]
pub struct CellMachine {
    state: CellState,
}

impl CellMachine {
    /// A freshly dispatched cell
    pub fn new() -> Self {
        Self {
            state: CellState::Dispatched,
        }
    }

    /// Current state
    pub fn state(&self) -> &CellState {
        &self.state
    }

    /// Move to `next`, rejecting illegal transitions
    pub fn advance(&mut self, next: CellState) -> Result<(), PipelineError> {
        if !self.state.can_transition_to(&next) {
            return Err(PipelineError::InvalidTransition {
                from: self.state.name(),
                to: next.name(),
            });
        }
        debug!(from = self.state.name(), to = next.name(), "cell transition");
        self.state = next;
        Ok(())
    }

    /// Consume the machine and return its state
    pub fn into_state(self) -> CellState {
        self.state
    }
}

impl Default for CellMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of processing one cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellOutcome {
    /// The finished record
    pub record: QueryRecord,

    /// Terminal state (`Recorded` or `Failed`)
    pub state: CellState,

    /// Set when extraction failed and the record fell back to no citations
    pub extraction_error: Option<String>,
}

impl CellOutcome {
    /// Provider failure reason, if the cell failed
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            CellState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    fn failed(cell: &SweepCell, reason: String) -> Self {
        Self {
            record: QueryRecord::failure(cell),
            state: CellState::Failed(reason),
            extraction_error: None,
        }
    }
}

/// Run one cell through search, extraction and normalization
pub async fn process_cell<P, X, R>(
    cell: &SweepCell,
    provider: &P,
    extractor: &ResponseExtractor<X>,
    normalizer: &CitationNormalizer<R>,
) -> Result<CellOutcome, PipelineError>
where
    P: SearchProvider + ?Sized,
    X: StructuredOutputProvider,
    R: RedirectResolver,
{
    let mut machine = CellMachine::new();

    let response = match provider.search(&cell.prompt.prompt, cell.temperature).await {
        Ok(response) => response,
        Err(e) => {
            let reason = e.to_string();
            warn!(provider = %cell.provider, iteration = cell.iteration, "provider call failed: {}", reason);
            machine.advance(CellState::Failed(reason.clone()))?;
            return Ok(CellOutcome::failed(cell, reason));
        }
    };

    let (raw, tool_calling, extraction_error) = match extractor.extract_response(&response).await {
        Ok(extraction) => (extraction.citations, extraction.tool_calling, None),
        Err(e) => {
            warn!(provider = %cell.provider, "citation extraction failed: {}", e);
            (Vec::new(), response.is_native(), Some(e.to_string()))
        }
    };
    machine.advance(CellState::Extracted(raw.clone()))?;

    let citations = normalizer.normalize(raw).await;
    machine.advance(CellState::Normalized(citations.clone()))?;

    let text = response_text(&response);
    let raw_response = (!text.trim().is_empty()).then_some(text);
    let record = QueryRecord::success(cell, raw_response, citations, tool_calling);
    machine.advance(CellState::Recorded)?;

    Ok(CellOutcome {
        record,
        state: machine.into_state(),
        extraction_error,
    })
}
