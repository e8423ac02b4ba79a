//! Provider payload shapes
//!
//! Each backend nests its citations differently. The payload is modelled as a
//! sum type with one variant per known shape. Every field that a provider may
//! omit (or send as `null`) decodes to its default, so a missing field is an
//! empty collection rather than an error.
//!
//! | Provider | Citation leaf |
//! |----------|---------------|
//! | Claude | `content[].citations[].url` on `text` blocks |
//! | Gemini | `candidates[0].groundingMetadata.groundingChunks[].web.uri` |
//! | ChatGPT | `output[].content[].annotations[].url` where `type == "url_citation"` |

use citesweep_domain::{ProviderKind, ProviderResponse, ResponseBody};
use serde::{Deserialize, Deserializer};

/// Decode `null` as the type's default
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decoded provider payload
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderPayload {
    /// Anthropic Messages API response
    Anthropic(AnthropicMessage),

    /// Gemini `generateContent` response
    Gemini(GeminiResponse),

    /// OpenAI Responses API response
    OpenAi(OpenAiResponse),

    /// Plain text answer without citation metadata
    Text(String),
}

impl ProviderPayload {
    /// Decode a raw provider response into its shape
    ///
    /// Fails only when the JSON contradicts the expected structure (for
    /// example an object where an array belongs).
    pub fn decode(response: &ProviderResponse) -> Result<Self, serde_json::Error> {
        let value = match &response.body {
            ResponseBody::Text(text) => return Ok(ProviderPayload::Text(text.clone())),
            ResponseBody::Json(value) => value,
        };

        Ok(match response.provider {
            ProviderKind::Claude => ProviderPayload::Anthropic(AnthropicMessage::deserialize(value)?),
            ProviderKind::Gemini => ProviderPayload::Gemini(GeminiResponse::deserialize(value)?),
            ProviderKind::ChatGpt => ProviderPayload::OpenAi(OpenAiResponse::deserialize(value)?),
            ProviderKind::Ollama => ProviderPayload::Text(
                value
                    .get("response")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
            ),
        })
    }

    /// The answer text carried by the payload
    pub fn text(&self) -> String {
        match self {
            ProviderPayload::Anthropic(message) => message.text(),
            ProviderPayload::Gemini(response) => response.text(),
            ProviderPayload::OpenAi(response) => response.text(),
            ProviderPayload::Text(text) => text.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Anthropic
// ---------------------------------------------------------------------------

/// Anthropic Messages API response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnthropicMessage {
    /// Content blocks (text, tool use, tool results)
    #[serde(deserialize_with = "nullable")]
    pub content: Vec<AnthropicBlock>,
}

/// One content block
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnthropicBlock {
    /// Block type (`text`, `server_tool_use`, `web_search_tool_result`, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Text of a `text` block
    pub text: Option<String>,

    /// Inline citations attached to a `text` block
    #[serde(deserialize_with = "nullable")]
    pub citations: Vec<AnthropicCitation>,
}

/// Inline citation on a text block
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnthropicCitation {
    /// Citation type (`web_search_result_location`, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Cited page URL
    pub url: Option<String>,

    /// Cited page title
    pub title: Option<String>,
}

impl AnthropicMessage {
    fn text(&self) -> String {
        self.content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

/// Gemini `generateContent` response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Candidate answers; only the first is used
    #[serde(deserialize_with = "nullable")]
    pub candidates: Vec<GeminiCandidate>,
}

/// One candidate answer
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Generated content
    pub content: Option<GeminiContent>,

    /// Search grounding evidence
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// Generated content of a candidate
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeminiContent {
    /// Content parts
    #[serde(deserialize_with = "nullable")]
    pub parts: Vec<GeminiPart>,
}

/// One content part
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeminiPart {
    /// Text of the part
    pub text: Option<String>,
}

/// Grounding metadata attached to a candidate
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroundingMetadata {
    /// Retrieved sources
    #[serde(deserialize_with = "nullable")]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One grounding chunk
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroundingChunk {
    /// Web source, when the chunk came from search
    pub web: Option<WebSource>,
}

/// Web source of a grounding chunk
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WebSource {
    /// Source URI (usually a grounding redirect link)
    pub uri: Option<String>,

    /// Source title (usually the domain)
    pub title: Option<String>,
}

impl GeminiResponse {
    /// The candidate the pipeline reads from
    pub fn first_candidate(&self) -> Option<&GeminiCandidate> {
        self.candidates.first()
    }

    fn text(&self) -> String {
        self.first_candidate()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// OpenAI
// ---------------------------------------------------------------------------

/// OpenAI Responses API response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OpenAiResponse {
    /// Output items (messages, tool calls)
    #[serde(deserialize_with = "nullable")]
    pub output: Vec<OpenAiOutputItem>,
}

/// One output item
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OpenAiOutputItem {
    /// Item type (`message`, `web_search_call`, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Message content
    #[serde(deserialize_with = "nullable")]
    pub content: Vec<OpenAiContent>,
}

/// One content entry of a message
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OpenAiContent {
    /// Content type (`output_text`, `refusal`, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Text of an `output_text` entry
    pub text: Option<String>,

    /// Annotations over the text
    #[serde(deserialize_with = "nullable")]
    pub annotations: Vec<OpenAiAnnotation>,
}

/// Annotation over output text
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OpenAiAnnotation {
    /// Annotation type (`url_citation`, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Cited URL
    pub url: Option<String>,

    /// Cited page title
    pub title: Option<String>,
}

impl OpenAiResponse {
    fn text(&self) -> String {
        self.output
            .iter()
            .flat_map(|item| item.content.iter())
            .filter(|c| c.kind == "output_text")
            .filter_map(|c| c.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}
