//! OpenAI Provider Implementation
//!
//! Two roles:
//!
//! - Search provider over the Responses API with the `web_search` tool forced
//! - Structured-output provider over chat completions with a strict
//!   `json_schema` response format, used for citation inference

use crate::config::ProviderSettings;
use crate::http::{build_client, env_key, parse_schema, send_json};
use crate::payload::ProviderPayload;
use crate::LlmError;
use async_trait::async_trait;
use citesweep_domain::traits::{SearchProvider, StructuredOutputProvider};
use citesweep_domain::{ProviderKind, ProviderResponse};
use serde_json::{json, Value};
use tracing::debug;

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Name given to the response schema in structured requests
pub const SCHEMA_NAME: &str = "citation_extraction";

/// OpenAI provider
pub struct OpenAiProvider {
    api_key: String,
    settings: ProviderSettings,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a provider with an explicit API key
    pub fn new(api_key: impl Into<String>, settings: ProviderSettings) -> Result<Self, LlmError> {
        let client = build_client(settings.timeout())?;
        Ok(Self {
            api_key: api_key.into(),
            settings,
            client,
        })
    }

    /// Create a provider with the key from `OPENAI_API_KEY`
    pub fn from_env(settings: ProviderSettings) -> Result<Self, LlmError> {
        Self::new(env_key(API_KEY_VAR)?, settings)
    }

    fn base(&self) -> &str {
        self.settings.endpoint.trim_end_matches('/')
    }

    /// Responses API body for a search prompt
    pub fn request_body(&self, prompt: &str, temperature: f64) -> Value {
        let mut body = json!({
            "model": self.settings.model,
            "input": prompt,
            "temperature": temperature,
        });

        if self.settings.tool_calling {
            body["tools"] = json!([{"type": "web_search"}]);
            body["tool_choice"] = json!({"type": "web_search"});
        }

        body
    }

    /// Chat completions body for a schema-constrained prompt
    pub fn structured_body(&self, prompt: &str, schema: &str) -> Result<Value, LlmError> {
        Ok(json!({
            "model": self.settings.model,
            "temperature": 0.0,
            "messages": [{"role": "user", "content": prompt}],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "strict": true,
                    "schema": parse_schema(schema)?,
                },
            },
        }))
    }
}

#[async_trait]
impl SearchProvider for OpenAiProvider {
    type Error = LlmError;

    fn kind(&self) -> ProviderKind {
        ProviderKind::ChatGpt
    }

    async fn search(&self, prompt: &str, temperature: f64) -> Result<ProviderResponse, Self::Error> {
        let url = format!("{}/responses", self.base());
        debug!(model = %self.settings.model, temperature, "querying openai");

        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt, temperature));

        let value = send_json(request, &self.settings.model).await?;
        let response = ProviderResponse::json(ProviderKind::ChatGpt, value);

        if self.settings.tool_calling {
            return Ok(response);
        }

        let payload = ProviderPayload::decode(&response)
            .map_err(|e| LlmError::InvalidResponse(format!("Unexpected output shape: {}", e)))?;
        Ok(ProviderResponse::text(ProviderKind::ChatGpt, payload.text()))
    }
}

#[async_trait]
impl StructuredOutputProvider for OpenAiProvider {
    type Error = LlmError;

    async fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        let url = format!("{}/chat/completions", self.base());
        debug!(model = %self.settings.model, "requesting structured output");

        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.structured_body(prompt, schema)?);

        let value = send_json(request, &self.settings.model).await?;

        value["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| LlmError::InvalidResponse("Completion has no message content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvidersConfig;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new("test-key", ProvidersConfig::default().chatgpt()).unwrap()
    }

    #[test]
    fn test_request_body_forces_web_search() {
        let body = provider().request_body("What happened?", 0.3);
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["input"], "What happened?");
        assert_eq!(body["tools"][0]["type"], "web_search");
        assert_eq!(body["tool_choice"]["type"], "web_search");
    }

    #[test]
    fn test_structured_body() {
        let schema = r#"{"type": "object", "properties": {"citations": {"type": "array"}}}"#;
        let body = provider().structured_body("Extract", schema).unwrap();

        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert_eq!(body["response_format"]["json_schema"]["schema"]["type"], "object");
    }

    #[test]
    fn test_structured_body_rejects_bad_schema() {
        assert!(matches!(
            provider().structured_body("Extract", "{not json"),
            Err(LlmError::Config(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires OPENAI_API_KEY and network access
    async fn test_openai_structured_integration() {
        let provider = OpenAiProvider::from_env(ProvidersConfig::default().chatgpt()).unwrap();
        let schema = r#"{"type":"object","properties":{"citations":{"type":"array","items":{"type":"string"}}},"required":["citations"],"additionalProperties":false}"#;
        let out = provider
            .generate_structured("List outlets in: 'According to CNN, ...'", schema)
            .await
            .unwrap();
        assert!(out.contains("citations"));
    }
}
