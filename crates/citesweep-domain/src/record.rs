//! Record module - sweep cells and their finished results

use crate::citation::{CanonicalCitation, RawCitation};
use crate::provider::ProviderKind;

/// A prompt from the catalog, with its grouping labels
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSpec {
    /// Prompt text sent to the provider
    pub prompt: String,

    /// Top-level grouping (e.g. the conflict the prompt is about)
    pub conflict: String,

    /// Category label attached to the prompt itself
    pub category: String,

    /// Group the prompt was listed under within the conflict
    pub subcategory: String,
}

/// One concrete combination of provider, prompt, temperature and iteration
#[derive(Debug, Clone, PartialEq)]
pub struct SweepCell {
    /// Backend to query
    pub provider: ProviderKind,

    /// Prompt and its labels
    pub prompt: PromptSpec,

    /// Sampling temperature forwarded to the provider
    pub temperature: f64,

    /// 1-based iteration index
    pub iteration: u32,
}

/// Lifecycle of a single sweep cell
///
/// ```text
/// Dispatched → Extracted → Normalized → Recorded
///      └──────────→ Failed
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CellState {
    /// The provider call has been issued
    Dispatched,

    /// Raw citations were pulled out of the response
    Extracted(Vec<RawCitation>),

    /// Citations were resolved and deduplicated
    Normalized(Vec<CanonicalCitation>),

    /// The query record has been produced
    Recorded,

    /// The provider call failed; terminal
    Failed(String),
}

impl CellState {
    /// Short state name for logging
    pub fn name(&self) -> &'static str {
        match self {
            CellState::Dispatched => "dispatched",
            CellState::Extracted(_) => "extracted",
            CellState::Normalized(_) => "normalized",
            CellState::Recorded => "recorded",
            CellState::Failed(_) => "failed",
        }
    }

    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, CellState::Recorded | CellState::Failed(_))
    }

    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: &CellState) -> bool {
        matches!(
            (self, next),
            (CellState::Dispatched, CellState::Extracted(_))
                | (CellState::Dispatched, CellState::Failed(_))
                | (CellState::Extracted(_), CellState::Normalized(_))
                | (CellState::Normalized(_), CellState::Recorded)
        )
    }
}

/// Finished result of one sweep cell
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecord {
    /// Backend that was queried
    pub provider: ProviderKind,

    /// Prompt text
    pub prompt_text: String,

    /// Conflict label from the catalog
    pub conflict: String,

    /// Category label from the catalog
    pub category: String,

    /// Subcategory label from the catalog
    pub subcategory: String,

    /// Temperature used
    pub temperature: f64,

    /// 1-based iteration index
    pub iteration: u32,

    /// Answer text, when the provider returned any
    pub raw_response: Option<String>,

    /// Canonical, deduplicated citations in first-seen order
    pub citations: Vec<CanonicalCitation>,

    /// True when citations came from native provider metadata
    pub tool_calling: bool,

    /// False when the provider call failed
    pub succeeded: bool,
}

impl QueryRecord {
    /// Record for a cell whose provider call succeeded
    pub fn success(
        cell: &SweepCell,
        raw_response: Option<String>,
        citations: Vec<CanonicalCitation>,
        tool_calling: bool,
    ) -> Self {
        Self {
            provider: cell.provider,
            prompt_text: cell.prompt.prompt.clone(),
            conflict: cell.prompt.conflict.clone(),
            category: cell.prompt.category.clone(),
            subcategory: cell.prompt.subcategory.clone(),
            temperature: cell.temperature,
            iteration: cell.iteration,
            raw_response,
            citations,
            tool_calling,
            succeeded: true,
        }
    }

    /// Record for a cell whose provider call failed
    pub fn failure(cell: &SweepCell) -> Self {
        Self {
            provider: cell.provider,
            prompt_text: cell.prompt.prompt.clone(),
            conflict: cell.prompt.conflict.clone(),
            category: cell.prompt.category.clone(),
            subcategory: cell.prompt.subcategory.clone(),
            temperature: cell.temperature,
            iteration: cell.iteration,
            raw_response: None,
            citations: Vec::new(),
            tool_calling: false,
            succeeded: false,
        }
    }

    /// Number of citations that stayed unresolved
    pub fn unresolved_count(&self) -> usize {
        self.citations.iter().filter(|c| !c.resolved).count()
    }
}
