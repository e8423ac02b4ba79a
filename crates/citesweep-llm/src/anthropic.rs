//! Anthropic Provider Implementation
//!
//! Queries the Messages API with the server-side web search tool enabled.
//! Citations arrive inline on the answer's text blocks.
//!
//! # Examples
//!
//! ```no_run
//! use citesweep_llm::{AnthropicProvider, ProvidersConfig};
//!
//! let provider = AnthropicProvider::from_env(ProvidersConfig::default().claude()).unwrap();
//! ```

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
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// API version header value
pub const API_VERSION: &str = "2023-06-01";

/// Web search tool revision
pub const WEB_SEARCH_TOOL: &str = "web_search_20250305";

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    api_key: String,
    settings: ProviderSettings,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Create a provider with an explicit API key
    pub fn new(api_key: impl Into<String>, settings: ProviderSettings) -> Result<Self, LlmError> {
        let client = build_client(settings.timeout())?;
        Ok(Self {
            api_key: api_key.into(),
            settings,
            client,
        })
    }

    /// Create a provider with the key from `ANTHROPIC_API_KEY`
    pub fn from_env(settings: ProviderSettings) -> Result<Self, LlmError> {
        Self::new(env_key(API_KEY_VAR)?, settings)
    }

    /// Request body for a prompt
    pub fn request_body(&self, prompt: &str, temperature: f64) -> Value {
        let mut body = json!({
            "model": self.settings.model,
            "max_tokens": self.settings.max_tokens,
            "temperature": temperature,
            "messages": [{"role": "user", "content": prompt}],
        });

        if self.settings.tool_calling {
            body["tools"] = json!([{
                "type": WEB_SEARCH_TOOL,
                "name": "web_search",
                "max_uses": self.settings.max_searches,
            }]);
        }

        body
    }
}

#[async_trait]
impl SearchProvider for AnthropicProvider {
    type Error = LlmError;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    async fn search(&self, prompt: &str, temperature: f64) -> Result<ProviderResponse, Self::Error> {
        let url = format!("{}/v1/messages", self.settings.endpoint.trim_end_matches('/'));
        debug!(model = %self.settings.model, temperature, "querying anthropic");

        let request = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request_body(prompt, temperature));

        let value = send_json(request, &self.settings.model).await?;
        let response = ProviderResponse::json(ProviderKind::Claude, value);

        if self.settings.tool_calling {
            return Ok(response);
        }

        let payload = ProviderPayload::decode(&response)
            .map_err(|e| LlmError::InvalidResponse(format!("Unexpected message shape: {}", e)))?;
        Ok(ProviderResponse::text(ProviderKind::Claude, payload.text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvidersConfig;

    fn provider(tool_calling: bool) -> AnthropicProvider {
        let mut settings = ProvidersConfig::default().claude();
        settings.tool_calling = tool_calling;
        AnthropicProvider::new("test-key", settings).unwrap()
    }

    #[test]
    fn test_request_body_with_search_tool() {
        let body = provider(true).request_body("Who won?", 0.7);

        assert_eq!(body["model"], "claude-sonnet-4-5");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Who won?");
        assert_eq!(body["tools"][0]["type"], WEB_SEARCH_TOOL);
        assert_eq!(body["tools"][0]["max_uses"], 5);
    }

    #[test]
    fn test_request_body_without_tools() {
        let body = provider(false).request_body("Who won?", 0.0);
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_kind() {
        assert_eq!(provider(true).kind(), ProviderKind::Claude);
    }

    #[tokio::test]
    #[ignore] // Requires ANTHROPIC_API_KEY and network access
    async fn test_anthropic_search_integration() {
        let provider = AnthropicProvider::from_env(ProvidersConfig::default().claude()).unwrap();
        let response = provider.search("What is the capital of France?", 0.0).await.unwrap();
        assert!(response.is_native());
    }
}
