//! Shared HTTP plumbing for the provider clients

use crate::LlmError;
use reqwest::{RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Build a client with the given request timeout
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Send a request and decode a successful JSON body
///
/// Non-success statuses are mapped onto `LlmError` variants; no retries.
pub(crate) async fn send_json(
    request: RequestBuilder,
    model: &str,
) -> Result<serde_json::Value, LlmError> {
    let response = request
        .send()
        .await
        .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

    let status = response.status();
    debug!(%status, model, "provider responded");

    if status.is_success() {
        return response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)));
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Authentication(error_text),
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        _ => LlmError::Communication(format!("HTTP {}: {}", status, error_text)),
    })
}

/// Read an API key from the environment
pub(crate) fn env_key(var: &str) -> Result<String, LlmError> {
    std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| LlmError::Config(format!("{} not set", var)))
}

/// Parse a JSON schema string into a value for a request body
pub(crate) fn parse_schema(schema: &str) -> Result<serde_json::Value, LlmError> {
    serde_json::from_str(schema)
        .map_err(|e| LlmError::Config(format!("Invalid JSON schema: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema() {
        assert!(parse_schema(r#"{"type": "object"}"#).is_ok());
        assert!(matches!(parse_schema("not json"), Err(LlmError::Config(_))));
    }

    #[test]
    fn test_env_key_missing() {
        let result = env_key("CITESWEEP_TEST_KEY_THAT_IS_NEVER_SET");
        assert!(matches!(result, Err(LlmError::Config(_))));
    }
}
