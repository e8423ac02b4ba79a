//! Integration tests for the extractor

use citesweep_domain::traits::CitationExtractor;
use citesweep_domain::{ProviderKind, ProviderResponse, RawCitation};
use citesweep_extractor::{ExtractorConfig, InferenceExtractor, ResponseExtractor};
use citesweep_llm::MockProvider;
use serde_json::json;

fn extractor(provider: MockProvider) -> ResponseExtractor<MockProvider> {
    ResponseExtractor::new(InferenceExtractor::new(provider, ExtractorConfig::default()))
}

#[tokio::test]
async fn test_gemini_grounding_links_extracted_in_order() {
    let extractor = extractor(MockProvider::default());
    let response = ProviderResponse::json(
        ProviderKind::Gemini,
        json!({
            "candidates": [{
                "content": {"parts": [{"text": "Summary"}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://vertexaisearch.cloud.google.com/grounding-api-redirect/B", "title": "b.example"}},
                        {"web": {"uri": "https://vertexaisearch.cloud.google.com/grounding-api-redirect/A", "title": "a.example"}},
                        {"web": {"uri": "https://vertexaisearch.cloud.google.com/grounding-api-redirect/B", "title": "b.example"}}
                    ],
                    "webSearchQueries": ["q"]
                }
            }]
        }),
    );

    let citations = extractor.extract(&response).await.unwrap();
    let texts: Vec<&str> = citations.iter().map(RawCitation::as_str).collect();
    assert_eq!(
        texts,
        vec![
            "https://vertexaisearch.cloud.google.com/grounding-api-redirect/B",
            "https://vertexaisearch.cloud.google.com/grounding-api-redirect/A",
        ]
    );
}

#[tokio::test]
async fn test_claude_without_tool_use_has_no_citations() {
    let extractor = extractor(MockProvider::default());
    let response = ProviderResponse::json(
        ProviderKind::Claude,
        json!({"content": [{"type": "text", "text": "I think so."}], "stop_reason": "end_turn"}),
    );

    assert!(extractor.extract(&response).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_plain_text_answer_inferred() {
    let mut provider = MockProvider::default();
    provider.add_response(
        "Fox News and MSNBC",
        r#"```json
{"citations": ["Fox News", "MSNBC", "CBS News"]}
```"#,
    );
    let extractor = extractor(provider);
    let response = ProviderResponse::text(
        ProviderKind::Ollama,
        "Fox News and MSNBC offered contrasting perspectives, while CBS News provided balanced coverage.",
    );

    let extraction = extractor.extract_response(&response).await.unwrap();
    assert!(!extraction.tool_calling);
    let texts: Vec<&str> = extraction.citations.iter().map(RawCitation::as_str).collect();
    assert_eq!(texts, vec!["Fox News", "MSNBC", "CBS News"]);
}
