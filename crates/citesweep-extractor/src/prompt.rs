//! Prompt construction for citation inference

/// JSON schema the extraction model must follow
pub const CITATION_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "citations": {
      "type": "array",
      "items": {"type": "string"}
    }
  },
  "required": ["citations"],
  "additionalProperties": false
}"#;

/// Builds the extraction prompt for one answer text
pub struct PromptBuilder<'a> {
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(EXTRACTION_INSTRUCTIONS.len() + self.text.len() + 64);

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\nText to analyze:\n---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\n");
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract every source cited in the following text.

Rules:
- Only include proper names of publications, news outlets, websites, organizations or institutions
- Only include names that literally appear in the text; never add sources that are not mentioned
- Exclude generic references such as "sources say", "reports indicate", "experts agree", "studies show" or "news outlets"
- Use the name as written, without surrounding quotes
- If no specific source is named, return an empty list"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON object only, no additional text):
{"citations": ["Name 1", "Name 2"]}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_text_and_rules() {
        let prompt = PromptBuilder::new("According to CNN, it rained.").build();

        assert!(prompt.contains("According to CNN, it rained."));
        assert!(prompt.contains("literally appear"));
        assert!(prompt.contains("sources say"));
        assert!(prompt.ends_with(r#"{"citations": ["Name 1", "Name 2"]}"#));
    }

    #[test]
    fn test_schema_is_valid_json() {
        let schema: serde_json::Value = serde_json::from_str(CITATION_SCHEMA).unwrap();
        assert_eq!(schema["properties"]["citations"]["type"], "array");
        assert_eq!(schema["required"][0], "citations");
    }
}
