//! Gemini Provider Implementation
//!
//! Queries `generateContent` with Google Search grounding. Sources come back
//! in the first candidate's grounding metadata, usually as
//! `vertexaisearch.cloud.google.com` redirect links that need resolving.

use crate::config::ProviderSettings;
use crate::http::{build_client, env_key, send_json};
use crate::payload::ProviderPayload;
use crate::LlmError;
use async_trait::async_trait;
use citesweep_domain::traits::SearchProvider;
use citesweep_domain::{ProviderKind, ProviderResponse};
use serde_json::{json, Value};
use tracing::debug;

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Google Gemini provider
pub struct GeminiProvider {
    api_key: String,
    settings: ProviderSettings,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a provider with an explicit API key
    pub fn new(api_key: impl Into<String>, settings: ProviderSettings) -> Result<Self, LlmError> {
        let client = build_client(settings.timeout())?;
        Ok(Self {
            api_key: api_key.into(),
            settings,
            client,
        })
    }

    /// Create a provider with the key from `GEMINI_API_KEY`
    pub fn from_env(settings: ProviderSettings) -> Result<Self, LlmError> {
        Self::new(env_key(API_KEY_VAR)?, settings)
    }

    /// Endpoint URL for the configured model
    pub fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }

    /// Request body for a prompt
    pub fn request_body(&self, prompt: &str, temperature: f64) -> Value {
        let mut body = json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {"temperature": temperature},
        });

        if self.settings.tool_calling {
            body["tools"] = json!([{"google_search": {}}]);
        }

        body
    }
}

#[async_trait]
impl SearchProvider for GeminiProvider {
    type Error = LlmError;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn search(&self, prompt: &str, temperature: f64) -> Result<ProviderResponse, Self::Error> {
        debug!(model = %self.settings.model, temperature, "querying gemini");

        let request = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(prompt, temperature));

        let value = send_json(request, &self.settings.model).await?;
        let response = ProviderResponse::json(ProviderKind::Gemini, value);

        if self.settings.tool_calling {
            return Ok(response);
        }

        let payload = ProviderPayload::decode(&response)
            .map_err(|e| LlmError::InvalidResponse(format!("Unexpected candidate shape: {}", e)))?;
        Ok(ProviderResponse::text(ProviderKind::Gemini, payload.text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvidersConfig;

    fn provider(tool_calling: bool) -> GeminiProvider {
        let mut settings = ProvidersConfig::default().gemini();
        settings.tool_calling = tool_calling;
        GeminiProvider::new("test-key", settings).unwrap()
    }

    #[test]
    fn test_url() {
        assert_eq!(
            provider(true).url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body() {
        let body = provider(true).request_body("Explain", 1.0);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Explain");
        assert_eq!(body["generationConfig"]["temperature"], 1.0);
        assert!(body["tools"][0]["google_search"].is_object());

        let body = provider(false).request_body("Explain", 1.0);
        assert!(body.get("tools").is_none());
    }

    #[tokio::test]
    #[ignore] // Requires GEMINI_API_KEY and network access
    async fn test_gemini_search_integration() {
        let provider = GeminiProvider::from_env(ProvidersConfig::default().gemini()).unwrap();
        let response = provider.search("Latest news on the Mars rover", 0.0).await.unwrap();
        assert!(response.is_native());
    }
}
