//! Provider module - backend identities and their raw responses

use std::fmt;

/// Search-capable language-model backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderKind {
    /// Anthropic Messages API with the web search tool
    Claude,

    /// Google Gemini with Google Search grounding
    Gemini,

    /// OpenAI Responses API with the web search tool
    ChatGpt,

    /// Local Ollama model (plain text, no native citations)
    Ollama,
}

impl ProviderKind {
    /// Every known provider, in sweep order
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Claude,
        ProviderKind::Gemini,
        ProviderKind::ChatGpt,
        ProviderKind::Ollama,
    ];

    /// Get the provider name as written to results (`model` field)
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Claude => "claude",
            ProviderKind::Gemini => "gemini",
            ProviderKind::ChatGpt => "chatgpt",
            ProviderKind::Ollama => "ollama",
        }
    }

    /// Parse a provider from a string, accepting vendor aliases
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "claude" | "anthropic" => Some(ProviderKind::Claude),
            "gemini" | "google" => Some(ProviderKind::Gemini),
            "chatgpt" | "openai" => Some(ProviderKind::ChatGpt),
            "ollama" => Some(ProviderKind::Ollama),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid provider: {}", s))
    }
}

/// Body of a provider response
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Provider-native JSON payload carrying citation metadata
    Json(serde_json::Value),

    /// Plain text answer with no structured citation metadata
    Text(String),
}

/// Raw response returned by a search provider for one query
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    /// Backend that produced the response
    pub provider: ProviderKind,

    /// Raw body, decoded later by the citation adapter
    pub body: ResponseBody,
}

impl ProviderResponse {
    /// Wrap a native JSON payload
    pub fn json(provider: ProviderKind, value: serde_json::Value) -> Self {
        Self {
            provider,
            body: ResponseBody::Json(value),
        }
    }

    /// Wrap a plain text answer
    pub fn text(provider: ProviderKind, text: impl Into<String>) -> Self {
        Self {
            provider,
            body: ResponseBody::Text(text.into()),
        }
    }

    /// Whether the response carries native citation metadata
    pub fn is_native(&self) -> bool {
        matches!(self.body, ResponseBody::Json(_))
    }
}
