//! citesweep LLM Provider Layer
//!
//! Provider clients for the search-augmented backends queried by a sweep,
//! plus the structured-output backends used for citation inference.
//!
//! # Providers
//!
//! - `AnthropicProvider`: Messages API with the web search tool
//! - `GeminiProvider`: `generateContent` with Google Search grounding
//! - `OpenAiProvider`: Responses API with web search, chat completions for
//!   structured output
//! - `OllamaProvider`: Local models (plain text answers, JSON-schema output)
//! - `MockProvider` / `MockSearchProvider`: Deterministic mocks for testing
//!
//! # Examples
//!
//! ```
//! use citesweep_llm::MockProvider;
//! use citesweep_domain::traits::StructuredOutputProvider;
//!
//! # async fn example() {
//! let provider = MockProvider::new(r#"{"citations": ["BBC"]}"#);
//! let result = provider.generate_structured("prompt", "{}").await.unwrap();
//! assert_eq!(result, r#"{"citations": ["BBC"]}"#);
//! # }
//! ```

#![warn(missing_docs)]

pub mod anthropic;
pub mod config;
pub mod gemini;
mod http;
pub mod ollama;
pub mod openai;
pub mod payload;

use async_trait::async_trait;
use citesweep_domain::traits::{SearchProvider, StructuredOutputProvider};
use citesweep_domain::{ProviderKind, ProviderResponse};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use config::ProvidersConfig;
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use payload::ProviderPayload;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Credentials rejected by the provider
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Provider could not be configured (missing key, bad schema, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock structured-output provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Specific responses are matched when the prompt *contains* the registered
/// key, so tests can key on the text being analysed rather than the whole
/// generated prompt.
///
/// # Examples
///
/// ```
/// use citesweep_llm::MockProvider;
/// use citesweep_domain::traits::StructuredOutputProvider;
///
/// # async fn example() {
/// let mut provider = MockProvider::default();
/// provider.add_response("CNN", r#"{"citations": ["CNN"]}"#);
/// let out = provider.generate_structured("According to CNN ...", "{}").await.unwrap();
/// assert_eq!(out, r#"{"citations": ["CNN"]}"#);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, MockReply)>>>,
    call_count: Arc<Mutex<usize>>,
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a specific response for prompts containing `key`
    pub fn add_response(&mut self, key: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((key.into(), MockReply::Text(response.into())));
    }

    /// Configure to return an error for prompts containing `key`
    pub fn add_error(&mut self, key: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((key.into(), MockReply::Error));
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner) = 0;
    }

    fn reply(&self, prompt: &str) -> Result<String, LlmError> {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner) += 1;

        let responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        match responses.iter().find(|(key, _)| prompt.contains(key.as_str())) {
            Some((_, MockReply::Text(text))) => Ok(text.clone()),
            Some((_, MockReply::Error)) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(r#"{"citations": []}"#)
    }
}

#[async_trait]
impl StructuredOutputProvider for MockProvider {
    type Error = LlmError;

    async fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        self.reply(prompt)
    }
}

/// Mock search provider returning canned responses
///
/// Responses are keyed by exact prompt; unknown prompts get the default.
#[derive(Debug, Clone)]
pub struct MockSearchProvider {
    kind: ProviderKind,
    default_response: ProviderResponse,
    responses: Arc<Mutex<Vec<(String, Option<ProviderResponse>)>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockSearchProvider {
    /// Create a mock that always returns `response`
    pub fn new(response: ProviderResponse) -> Self {
        Self {
            kind: response.provider,
            default_response: response,
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Return `response` for this exact prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: ProviderResponse) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((prompt.into(), Some(response)));
    }

    /// Fail with a communication error for this exact prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((prompt.into(), None));
    }

    /// Get the number of searches issued
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    type Error = LlmError;

    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn search(&self, prompt: &str, _temperature: f64) -> Result<ProviderResponse, Self::Error> {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner) += 1;

        let responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        match responses.iter().find(|(key, _)| key == prompt) {
            Some((_, Some(response))) => Ok(response.clone()),
            Some((_, None)) => Err(LlmError::Communication("Mock provider failure".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate_structured("any prompt", "{}").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_matches_fragment() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate_structured("say hello there", "{}").await.unwrap(), "world");
        assert_eq!(provider.generate_structured("foo!", "{}").await.unwrap(), "bar");
        assert_eq!(
            provider.generate_structured("unknown", "{}").await.unwrap(),
            r#"{"citations": []}"#
        );
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate_structured("prompt1", "{}").await.unwrap();
        provider.generate_structured("prompt2", "{}").await.unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.generate_structured("a bad prompt", "{}").await;
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_count() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate_structured("test", "{}").await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_search_provider() {
        let default = ProviderResponse::text(ProviderKind::Ollama, "default");
        let mut provider = MockSearchProvider::new(default.clone());
        provider.add_response("q1", ProviderResponse::text(ProviderKind::Ollama, "one"));
        provider.add_error("q2");

        assert_eq!(provider.kind(), ProviderKind::Ollama);
        assert_eq!(
            provider.search("q1", 0.0).await.unwrap(),
            ProviderResponse::text(ProviderKind::Ollama, "one")
        );
        assert!(matches!(
            provider.search("q2", 0.0).await,
            Err(LlmError::Communication(_))
        ));
        assert_eq!(provider.search("other", 0.0).await.unwrap(), default);
        assert_eq!(provider.call_count(), 3);
    }
}
