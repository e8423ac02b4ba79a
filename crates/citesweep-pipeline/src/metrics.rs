//! Metrics collected during a sweep

use crate::cell::CellOutcome;
use citesweep_domain::ProviderKind;
use std::collections::BTreeMap;

/// Per-provider tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderTally {
    /// Successful calls
    pub succeeded: usize,

    /// Failed calls
    pub failed: usize,

    /// Citations across successful calls
    pub citations: usize,
}

/// Metrics collected while running a sweep
#[derive(Debug, Clone, Default)]
pub struct SweepMetrics {
    /// Cells that ran to a terminal state
    pub cells: usize,

    /// Cells whose provider call succeeded
    pub succeeded: usize,

    /// Cells whose provider call failed
    pub failed: usize,

    /// Canonical citations across successful cells
    pub citations: usize,

    /// Citations kept with `resolved = false`
    pub unresolved: usize,

    /// Successful cells whose citations came from native metadata
    pub native: usize,

    /// Cells where extraction failed and no citations were kept
    pub extraction_fallbacks: usize,

    /// Tallies per provider
    pub per_provider: BTreeMap<ProviderKind, ProviderTally>,

    /// Wall time of the sweep in seconds
    pub total_runtime_secs: u64,
}

impl SweepMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished cell
    pub fn record(&mut self, outcome: &CellOutcome) {
        let record = &outcome.record;
        let tally = self.per_provider.entry(record.provider).or_default();
        self.cells += 1;

        if record.succeeded {
            self.succeeded += 1;
            self.citations += record.citations.len();
            self.unresolved += record.unresolved_count();
            if record.tool_calling {
                self.native += 1;
            }
            tally.succeeded += 1;
            tally.citations += record.citations.len();
        } else {
            self.failed += 1;
            tally.failed += 1;
        }

        if outcome.extraction_error.is_some() {
            self.extraction_fallbacks += 1;
        }
    }

    /// Average citations per successful response
    pub fn average_citations(&self) -> f64 {
        if self.succeeded == 0 {
            0.0
        } else {
            self.citations as f64 / self.succeeded as f64
        }
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Sweep Summary".to_string(),
            "=============".to_string(),
            format!("Total API calls: {}", self.cells),
            format!("Successful calls: {}", self.succeeded),
            format!("Failed calls: {}", self.failed),
            format!("Total citations found: {}", self.citations),
            format!("Unresolved citations: {}", self.unresolved),
            format!("Average citations per response: {:.2}", self.average_citations()),
        ];

        if self.extraction_fallbacks > 0 {
            lines.push(format!("Extraction fallbacks: {}", self.extraction_fallbacks));
        }
        lines.push(format!("Total runtime: {}s", self.total_runtime_secs));

        if !self.per_provider.is_empty() {
            lines.push(String::new());
            lines.push("By provider:".to_string());
            for (provider, tally) in &self.per_provider {
                lines.push(format!(
                    "  {}: {} ok, {} failed, {} citations",
                    provider, tally.succeeded, tally.failed, tally.citations
                ));
            }
        }

        lines.join("\n")
    }
}
