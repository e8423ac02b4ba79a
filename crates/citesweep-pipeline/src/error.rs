//! Error types for the sweep pipeline

use thiserror::Error;

/// Errors that can occur while running a sweep
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A cell tried to move between states in an illegal order
    #[error("Invalid cell transition: {from} -> {to}")]
    InvalidTransition {
        /// State the cell was in
        from: &'static str,
        /// State it tried to enter
        to: &'static str,
    },

    /// No provider is configured for a planned cell
    #[error("No provider configured for {0}")]
    MissingProvider(String),
}
