//! Parse structured extraction output into citation names

use crate::error::ExtractorError;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CitationList {
    citations: Vec<String>,
}

/// Parse a `{"citations": [...]}` completion
///
/// Blank entries are dropped. Anything that does not follow the schema is a
/// `Schema` error.
pub fn parse_citation_list(response: &str) -> Result<Vec<String>, ExtractorError> {
    let json_str = extract_json(response)?;

    let list: CitationList = serde_json::from_str(&json_str)?;

    Ok(list
        .citations
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::Schema("Empty code block".to_string()));
        }

        // Skip the opening fence and, when present, the closing one
        let end = if lines[lines.len() - 1].trim() == "```" {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_list() {
        let names = parse_citation_list(r#"{"citations": ["CNN", "BBC", "Reuters"]}"#).unwrap();
        assert_eq!(names, vec!["CNN", "BBC", "Reuters"]);
    }

    #[test]
    fn test_parse_with_markdown_wrapper() {
        let response = "```json\n{\"citations\": [\"NPR\"]}\n```";
        assert_eq!(parse_citation_list(response).unwrap(), vec!["NPR"]);
    }

    #[test]
    fn test_parse_unterminated_fence() {
        let response = "```\n{\"citations\": []}";
        assert!(parse_citation_list(response).unwrap().is_empty());
    }

    #[test]
    fn test_blank_entries_dropped() {
        let names = parse_citation_list(r#"{"citations": ["  ", "MIT ", ""]}"#).unwrap();
        assert_eq!(names, vec!["MIT"]);
    }

    #[test]
    fn test_schema_violations() {
        for bad in [
            "This is not JSON",
            r#"["CNN"]"#,
            r#"{"sources": ["CNN"]}"#,
            r#"{"citations": "CNN"}"#,
            r#"{"citations": [1, 2]}"#,
            r#"{"citations": [], "extra": true}"#,
            "```",
        ] {
            assert!(
                matches!(parse_citation_list(bad), Err(ExtractorError::Schema(_))),
                "expected schema error for {:?}",
                bad
            );
        }
    }
}
