//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Structured-output provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Extraction call exceeded its time budget
    #[error("Extraction timeout")]
    Timeout,

    /// Provider payload did not match its expected shape
    #[error("Payload shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Extraction output did not follow the `{citations: [string]}` schema
    #[error("Extraction schema error: {0}")]
    Schema(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::Schema(e.to_string())
    }
}
