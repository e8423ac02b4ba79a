//! Extraction-by-Inference
//!
//! For answers without native citation metadata, a structured-output model
//! is asked to list the outlets the text names. Malformed model output is
//! not fatal: it is logged and yields no citations.

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_citation_list;
use crate::prompt::{PromptBuilder, CITATION_SCHEMA};
use async_trait::async_trait;
use citesweep_domain::traits::{CitationExtractor, StructuredOutputProvider};
use citesweep_domain::{
    dedup_citations, dedup_raw, CanonicalCitation, ProviderResponse, RawCitation, ResponseBody,
};
use citesweep_llm::ProviderPayload;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Infers cited outlet names from free text
pub struct InferenceExtractor<P> {
    provider: P,
    config: ExtractorConfig,
}

impl<P: StructuredOutputProvider> InferenceExtractor<P> {
    /// Create a new inference extractor
    pub fn new(provider: P, config: ExtractorConfig) -> Self {
        Self { provider, config }
    }

    /// Get the underlying structured-output provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Ask the model for the outlet names in `text`
    ///
    /// Returns first-seen order without duplicates. Names that do not
    /// literally occur in the text are discarded. Provider failures and
    /// timeouts are errors; schema violations are not.
    pub async fn extract_names(&self, text: &str) -> Result<Vec<RawCitation>, ExtractorError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let text = truncate_chars(text, self.config.max_text_length);
        let prompt = PromptBuilder::new(text).build();
        debug!("Extraction prompt length: {} chars", prompt.len());

        let output = timeout(
            self.config.extraction_timeout(),
            self.provider.generate_structured(&prompt, CITATION_SCHEMA),
        )
        .await
        .map_err(|_| ExtractorError::Timeout)?
        .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        let names = match parse_citation_list(&output) {
            Ok(names) => names,
            Err(e) => {
                warn!("Discarding extraction output: {}", e);
                return Ok(Vec::new());
            }
        };

        let haystack = text.to_lowercase();
        let names = names.into_iter().filter(|name| {
            let present = haystack.contains(&name.to_lowercase());
            if !present {
                debug!(name = %name, "dropping name not present in text");
            }
            present
        });

        Ok(dedup_raw(names.filter_map(RawCitation::new)))
    }

    /// Infer canonical outlet citations from `text`
    ///
    /// Never fails: any extraction error is logged and yields no citations.
    pub async fn infer(&self, text: &str) -> Vec<CanonicalCitation> {
        match self.extract_names(text).await {
            Ok(names) => dedup_citations(names.iter().map(CanonicalCitation::outlet)),
            Err(e) => {
                warn!("Citation inference failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Answer text of a response, for either body kind
pub fn response_text(response: &ProviderResponse) -> String {
    match &response.body {
        ResponseBody::Text(text) => text.clone(),
        ResponseBody::Json(_) => ProviderPayload::decode(response)
            .map(|payload| payload.text())
            .unwrap_or_default(),
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            warn!("Truncating {} char answer to {} chars", text.chars().count(), max_chars);
            &text[..idx]
        }
        None => text,
    }
}

#[async_trait]
impl<P: StructuredOutputProvider> CitationExtractor for InferenceExtractor<P> {
    type Error = ExtractorError;

    async fn extract(&self, response: &ProviderResponse) -> Result<Vec<RawCitation>, Self::Error> {
        self.extract_names(&response_text(response)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citesweep_domain::ProviderKind;
    use citesweep_llm::MockProvider;

    fn extractor(provider: MockProvider) -> InferenceExtractor<MockProvider> {
        InferenceExtractor::new(provider, ExtractorConfig::default())
    }

    #[tokio::test]
    async fn test_infer_named_outlets() {
        let provider = MockProvider::new(r#"{"citations": ["CNN", "BBC", "Reuters", "CNN"]}"#);
        let citations = extractor(provider)
            .infer("According to CNN, the conflict began in 2022. BBC reported similar findings, while Reuters confirmed the timeline.")
            .await;

        let names: Vec<&str> = citations.iter().map(|c| c.source_url_or_name.as_str()).collect();
        assert_eq!(names, vec!["CNN", "BBC", "Reuters"]);
        assert!(citations.iter().all(|c| c.resolved));
    }

    #[tokio::test]
    async fn test_generic_phrases_yield_nothing() {
        let provider = MockProvider::new(r#"{"citations": []}"#);
        let citations = extractor(provider)
            .infer("Multiple sources suggest that recent reports indicate significant developments.")
            .await;
        assert!(citations.is_empty());
    }

    #[tokio::test]
    async fn test_names_absent_from_text_are_dropped() {
        let provider = MockProvider::new(r#"{"citations": ["NPR", "The Onion"]}"#);
        let names = extractor(provider).extract_names("NPR also covered the story.").await.unwrap();
        assert_eq!(names, vec![RawCitation::new("NPR").unwrap()]);
    }

    #[tokio::test]
    async fn test_malformed_output_yields_empty() {
        let provider = MockProvider::new("CNN, BBC");
        let names = extractor(provider).extract_names("CNN and BBC").await.unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_is_error_but_infer_is_empty() {
        let mut provider = MockProvider::default();
        provider.add_error("Fox News");
        let extractor = extractor(provider);

        let text = "Fox News and MSNBC offered contrasting perspectives.";
        assert!(matches!(
            extractor.extract_names(text).await,
            Err(ExtractorError::Llm(_))
        ));
        assert!(extractor.infer(text).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_text_skips_provider() {
        let provider = MockProvider::default();
        let extractor = extractor(provider);
        assert!(extractor.extract_names("   ").await.unwrap().is_empty());
        assert_eq!(extractor.provider().call_count(), 0);
    }

    #[tokio::test]
    async fn test_long_text_is_truncated() {
        let provider = MockProvider::new(r#"{"citations": ["Reuters"]}"#);
        let config = ExtractorConfig {
            max_text_length: 10,
            ..ExtractorConfig::default()
        };
        let extractor = InferenceExtractor::new(provider, config);

        // "Reuters" sits past the cut, so it is not literally present
        let names = extractor
            .extract_names("Lorem ipsum dolor sit amet, Reuters said.")
            .await
            .unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn test_extract_reads_text_and_json_bodies() {
        let provider = MockProvider::new(r#"{"citations": ["Al Jazeera"]}"#);
        let extractor = extractor(provider);

        let text = ProviderResponse::text(ProviderKind::Ollama, "Confirmed by Al Jazeera.");
        assert_eq!(extractor.extract(&text).await.unwrap().len(), 1);

        let json = ProviderResponse::json(
            ProviderKind::Claude,
            serde_json::json!({"content": [{"type": "text", "text": "Per Al Jazeera."}]}),
        );
        assert_eq!(extractor.extract(&json).await.unwrap().len(), 1);
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
