//! Provider Response Adapter
//!
//! Pulls citation fragments out of native provider metadata. Every level of
//! the walk is optional: a missing field contributes nothing, and a payload
//! that contradicts its expected shape yields an empty set. No I/O.

use crate::error::ExtractorError;
use async_trait::async_trait;
use citesweep_domain::traits::CitationExtractor;
use citesweep_domain::{dedup_raw, ProviderResponse, RawCitation};
use citesweep_llm::payload::{AnthropicMessage, GeminiResponse, OpenAiResponse, ProviderPayload};
use tracing::{debug, warn};

/// Annotation type carrying a cited URL in OpenAI output
const URL_CITATION: &str = "url_citation";

/// Extracts citations from provider-native metadata
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCitationExtractor;

impl NativeCitationExtractor {
    /// Create a new adapter
    pub fn new() -> Self {
        Self
    }

    /// Walk a decoded payload, first-seen order, duplicates removed
    pub fn citations(payload: &ProviderPayload) -> Vec<RawCitation> {
        let fragments = match payload {
            ProviderPayload::Anthropic(message) => anthropic_urls(message),
            ProviderPayload::Gemini(response) => gemini_uris(response),
            ProviderPayload::OpenAi(response) => openai_urls(response),
            ProviderPayload::Text(_) => Vec::new(),
        };
        dedup_raw(fragments.into_iter().filter_map(RawCitation::new))
    }

    /// Decode and walk a provider response
    ///
    /// A shape mismatch is logged and produces no citations.
    pub fn extract_from(response: &ProviderResponse) -> Vec<RawCitation> {
        match ProviderPayload::decode(response) {
            Ok(payload) => {
                let citations = Self::citations(&payload);
                debug!(
                    provider = %response.provider,
                    count = citations.len(),
                    "native citations extracted"
                );
                citations
            }
            Err(e) => {
                let mismatch = ExtractorError::ShapeMismatch(e.to_string());
                warn!(provider = %response.provider, "{}", mismatch);
                Vec::new()
            }
        }
    }
}

fn anthropic_urls(message: &AnthropicMessage) -> Vec<String> {
    message
        .content
        .iter()
        .filter(|block| block.kind == "text")
        .flat_map(|block| block.citations.iter())
        .filter_map(|citation| citation.url.clone())
        .collect()
}

fn gemini_uris(response: &GeminiResponse) -> Vec<String> {
    response
        .first_candidate()
        .and_then(|candidate| candidate.grounding_metadata.as_ref())
        .map(|metadata| {
            metadata
                .grounding_chunks
                .iter()
                .filter_map(|chunk| chunk.web.as_ref())
                .filter_map(|web| web.uri.clone())
                .collect()
        })
        .unwrap_or_default()
}

fn openai_urls(response: &OpenAiResponse) -> Vec<String> {
    response
        .output
        .iter()
        .flat_map(|item| item.content.iter())
        .flat_map(|content| content.annotations.iter())
        .filter(|annotation| annotation.kind == URL_CITATION)
        .filter_map(|annotation| annotation.url.clone())
        .collect()
}

#[async_trait]
impl CitationExtractor for NativeCitationExtractor {
    type Error = ExtractorError;

    async fn extract(&self, response: &ProviderResponse) -> Result<Vec<RawCitation>, Self::Error> {
        Ok(Self::extract_from(response))
    }
}
