//! Configuration for the provider clients

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings shared by every provider client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Model identifier sent to the API; empty selects the provider default
    pub model: String,

    /// Base URL of the API; empty selects the provider default
    pub endpoint: String,

    /// Request timeout (seconds)
    pub timeout_secs: u64,

    /// Whether the provider's search tool is requested
    ///
    /// When off, the provider answers from its own knowledge and citations
    /// are inferred from the answer text.
    pub tool_calling: bool,

    /// Upper bound on generated tokens, for APIs that require one
    pub max_tokens: u32,

    /// Maximum search tool invocations per request (Anthropic only)
    pub max_searches: u32,
}

impl ProviderSettings {
    fn with(model: &str, endpoint: &str) -> Self {
        Self {
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            ..Self::default()
        }
    }

    /// Fill an empty model or endpoint with the given defaults
    pub fn or_defaults(&self, model: &str, endpoint: &str) -> Self {
        let mut settings = self.clone();
        if settings.model.trim().is_empty() {
            settings.model = model.to_string();
        }
        if settings.endpoint.trim().is_empty() {
            settings.endpoint = endpoint.to_string();
        }
        settings
    }

    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if !self.endpoint.is_empty()
            && !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://"))
        {
            return Err(format!("endpoint must be an http(s) URL: {}", self.endpoint));
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            model: String::new(),
            endpoint: String::new(),
            timeout_secs: 120,
            tool_calling: true,
            max_tokens: 4096,
            max_searches: 5,
        }
    }
}

/// Default Anthropic model
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-sonnet-4-5";
/// Default Anthropic endpoint
pub const ANTHROPIC_DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";
/// Default Gemini model
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default Gemini endpoint
pub const GEMINI_DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
/// Default OpenAI model
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";
/// Default OpenAI endpoint
pub const OPENAI_DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";
/// Default Ollama model
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3.1";
/// Default Ollama endpoint
pub const OLLAMA_DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Settings for every provider, as read from the `[providers]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Anthropic Messages API
    pub claude: ProviderSettings,

    /// Google Gemini
    pub gemini: ProviderSettings,

    /// OpenAI Responses API
    pub chatgpt: ProviderSettings,

    /// Local Ollama server
    pub ollama: ProviderSettings,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            claude: ProviderSettings::with(ANTHROPIC_DEFAULT_MODEL, ANTHROPIC_DEFAULT_ENDPOINT),
            gemini: ProviderSettings::with(GEMINI_DEFAULT_MODEL, GEMINI_DEFAULT_ENDPOINT),
            chatgpt: ProviderSettings::with(OPENAI_DEFAULT_MODEL, OPENAI_DEFAULT_ENDPOINT),
            ollama: ProviderSettings {
                timeout_secs: 300,
                tool_calling: false,
                ..ProviderSettings::with(OLLAMA_DEFAULT_MODEL, OLLAMA_DEFAULT_ENDPOINT)
            },
        }
    }
}

impl ProvidersConfig {
    /// Anthropic settings with defaults filled in
    pub fn claude(&self) -> ProviderSettings {
        self.claude.or_defaults(ANTHROPIC_DEFAULT_MODEL, ANTHROPIC_DEFAULT_ENDPOINT)
    }

    /// Gemini settings with defaults filled in
    pub fn gemini(&self) -> ProviderSettings {
        self.gemini.or_defaults(GEMINI_DEFAULT_MODEL, GEMINI_DEFAULT_ENDPOINT)
    }

    /// OpenAI settings with defaults filled in
    pub fn chatgpt(&self) -> ProviderSettings {
        self.chatgpt.or_defaults(OPENAI_DEFAULT_MODEL, OPENAI_DEFAULT_ENDPOINT)
    }

    /// Ollama settings with defaults filled in
    pub fn ollama(&self) -> ProviderSettings {
        self.ollama.or_defaults(OLLAMA_DEFAULT_MODEL, OLLAMA_DEFAULT_ENDPOINT)
    }

    /// Validate every provider's settings
    pub fn validate(&self) -> Result<(), String> {
        for (name, settings) in [
            ("claude", &self.claude),
            ("gemini", &self.gemini),
            ("chatgpt", &self.chatgpt),
            ("ollama", &self.ollama),
        ] {
            settings
                .validate()
                .map_err(|e| format!("providers.{}: {}", name, e))?;
        }
        Ok(())
    }
}
