//! Routes a response to native or inferred extraction

use crate::adapter::NativeCitationExtractor;
use crate::error::ExtractorError;
use crate::inference::InferenceExtractor;
use async_trait::async_trait;
use citesweep_domain::traits::{CitationExtractor, StructuredOutputProvider};
use citesweep_domain::{ProviderResponse, RawCitation};

/// Citations pulled from one response, with their origin
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Raw citations in first-seen order
    pub citations: Vec<RawCitation>,

    /// True when they came from native provider metadata
    pub tool_calling: bool,
}

/// Extracts citations from any provider response
///
/// JSON payloads go through the native adapter; plain text answers go
/// through inference.
pub struct ResponseExtractor<P> {
    native: NativeCitationExtractor,
    inference: InferenceExtractor<P>,
}

impl<P: StructuredOutputProvider> ResponseExtractor<P> {
    /// Create a dispatching extractor
    pub fn new(inference: InferenceExtractor<P>) -> Self {
        Self {
            native: NativeCitationExtractor::new(),
            inference,
        }
    }

    /// Get the inference extractor
    pub fn inference(&self) -> &InferenceExtractor<P> {
        &self.inference
    }

    /// Extract citations and report which path produced them
    pub async fn extract_response(
        &self,
        response: &ProviderResponse,
    ) -> Result<Extraction, ExtractorError> {
        if response.is_native() {
            Ok(Extraction {
                citations: self.native.extract(response).await?,
                tool_calling: true,
            })
        } else {
            Ok(Extraction {
                citations: self.inference.extract(response).await?,
                tool_calling: false,
            })
        }
    }
}

#[async_trait]
impl<P: StructuredOutputProvider> CitationExtractor for ResponseExtractor<P> {
    type Error = ExtractorError;

    async fn extract(&self, response: &ProviderResponse) -> Result<Vec<RawCitation>, Self::Error> {
        Ok(self.extract_response(response).await?.citations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractorConfig;
    use citesweep_domain::ProviderKind;
    use citesweep_llm::MockProvider;
    use serde_json::json;

    fn extractor(provider: MockProvider) -> ResponseExtractor<MockProvider> {
        ResponseExtractor::new(InferenceExtractor::new(provider, ExtractorConfig::default()))
    }

    #[tokio::test]
    async fn test_native_path_skips_inference() {
        let extractor = extractor(MockProvider::default());
        let response = ProviderResponse::json(
            ProviderKind::ChatGpt,
            json!({"output": [{"type": "message", "content": [{
                "type": "output_text",
                "annotations": [{"type": "url_citation", "url": "https://a.example"}]
            }]}]}),
        );

        let extraction = extractor.extract_response(&response).await.unwrap();
        assert!(extraction.tool_calling);
        assert_eq!(extraction.citations.len(), 1);
        assert_eq!(extractor.inference().provider().call_count(), 0);
    }

    #[tokio::test]
    async fn test_text_path_uses_inference() {
        let extractor = extractor(MockProvider::new(r#"{"citations": ["MIT"]}"#));
        let response = ProviderResponse::text(ProviderKind::Ollama, "MIT researchers found ...");

        let extraction = extractor.extract_response(&response).await.unwrap();
        assert!(!extraction.tool_calling);
        assert_eq!(extraction.citations, vec![RawCitation::new("MIT").unwrap()]);
        assert_eq!(extractor.inference().provider().call_count(), 1);
    }
}
