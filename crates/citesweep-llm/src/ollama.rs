//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API.
//!
//! Local models have no search tool, so answers come back as plain text and
//! their citations are always inferred. Ollama's `format` field accepts a
//! JSON schema, which makes it usable as the extraction model too.
//!
//! # Examples
//!
//! ```no_run
//! use citesweep_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.1").unwrap();
//! ```

use crate::config::{ProviderSettings, OLLAMA_DEFAULT_ENDPOINT};
use crate::http::{build_client, parse_schema, send_json};
use crate::LlmError;
use async_trait::async_trait;
use citesweep_domain::traits::{SearchProvider, StructuredOutputProvider};
use citesweep_domain::{ProviderKind, ProviderResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ollama API provider for local LLM inference
pub struct OllamaProvider {
    settings: ProviderSettings,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Debug, Serialize)]
pub struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<serde_json::Value>,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f64,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.1", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let settings = ProviderSettings {
            endpoint: endpoint.into(),
            model: model.into(),
            tool_calling: false,
            ..ProviderSettings::default()
        };
        Self::with_settings(settings)
    }

    /// Create a provider from configured settings
    pub fn with_settings(settings: ProviderSettings) -> Result<Self, LlmError> {
        let client = build_client(settings.timeout())?;
        Ok(Self { settings, client })
    }

    /// Create a new Ollama provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(OLLAMA_DEFAULT_ENDPOINT, model)
    }

    /// Request body for a prompt, optionally constrained to a schema
    pub fn request_body(
        &self,
        prompt: &str,
        temperature: f64,
        format: Option<serde_json::Value>,
    ) -> OllamaGenerateRequest {
        OllamaGenerateRequest {
            model: self.settings.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            format,
            options: OllamaOptions { temperature },
        }
    }

    async fn generate(&self, body: &OllamaGenerateRequest) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.settings.endpoint.trim_end_matches('/'));
        let request = self.client.post(&url).json(body);

        let value = send_json(request, &self.settings.model).await?;
        let parsed: OllamaGenerateResponse = serde_json::from_value(value)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
        Ok(parsed.response)
    }
}

#[async_trait]
impl SearchProvider for OllamaProvider {
    type Error = LlmError;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn search(&self, prompt: &str, temperature: f64) -> Result<ProviderResponse, Self::Error> {
        debug!(model = %self.settings.model, temperature, "querying ollama");
        let text = self
            .generate(&self.request_body(prompt, temperature, None))
            .await?;
        Ok(ProviderResponse::text(ProviderKind::Ollama, text))
    }
}

#[async_trait]
impl StructuredOutputProvider for OllamaProvider {
    type Error = LlmError;

    async fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        let body = self.request_body(prompt, 0.0, Some(parse_schema(schema)?));
        self.generate(&body).await
    }
}
