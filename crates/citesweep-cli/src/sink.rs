//! Result persistence.
//!
//! Only records whose provider call succeeded are written. JSON gets one
//! entry per record; CSV gets one row per (record, citation), so a record
//! without citations produces no CSV rows.

use crate::error::Result;
use citesweep_domain::QueryRecord;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Destination for finished records.
pub trait RecordSink {
    /// Write the records, returning how many entries were written.
    fn write(&self, records: &[QueryRecord]) -> Result<usize>;

    /// Where the records go.
    fn path(&self) -> &Path;
}

#[derive(Debug, Serialize)]
struct JsonCitation<'a> {
    source_url_or_name: &'a str,
    resolved: bool,
}

#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    model: &'a str,
    prompt: &'a str,
    conflict: &'a str,
    category: &'a str,
    subcategory: &'a str,
    temperature: f64,
    iteration: u32,
    response: Option<&'a str>,
    citations: Vec<JsonCitation<'a>>,
    tool_calling: bool,
}

impl<'a> From<&'a QueryRecord> for JsonRecord<'a> {
    fn from(record: &'a QueryRecord) -> Self {
        Self {
            model: record.provider.as_str(),
            prompt: &record.prompt_text,
            conflict: &record.conflict,
            category: &record.category,
            subcategory: &record.subcategory,
            temperature: record.temperature,
            iteration: record.iteration,
            response: record.raw_response.as_deref(),
            citations: record
                .citations
                .iter()
                .map(|c| JsonCitation {
                    source_url_or_name: &c.source_url_or_name,
                    resolved: c.resolved,
                })
                .collect(),
            tool_calling: record.tool_calling,
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    model: &'a str,
    prompt: &'a str,
    conflict: &'a str,
    category: &'a str,
    subcategory: &'a str,
    temperature: f64,
    iteration: u32,
    citation: &'a str,
}

/// Pretty-printed JSON array of records.
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    /// Write to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for JsonSink {
    fn write(&self, records: &[QueryRecord]) -> Result<usize> {
        let entries: Vec<JsonRecord<'_>> = records
            .iter()
            .filter(|r| r.succeeded)
            .map(JsonRecord::from)
            .collect();
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(entries.len())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Flat CSV, one row per citation.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Write to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for CsvSink {
    fn write(&self, records: &[QueryRecord]) -> Result<usize> {
        let mut writer = csv::Writer::from_path(&self.path)?;
        let mut rows = 0;

        for record in records.iter().filter(|r| r.succeeded) {
            for citation in &record.citations {
                writer.serialize(CsvRow {
                    model: record.provider.as_str(),
                    prompt: &record.prompt_text,
                    conflict: &record.conflict,
                    category: &record.category,
                    subcategory: &record.subcategory,
                    temperature: record.temperature,
                    iteration: record.iteration,
                    citation: &citation.source_url_or_name,
                })?;
                rows += 1;
            }
        }

        // Header only appears with the first row; keep it for empty files too
        if rows == 0 {
            writer.write_record([
                "model",
                "prompt",
                "conflict",
                "category",
                "subcategory",
                "temperature",
                "iteration",
                "citation",
            ])?;
        }
        writer.flush()?;
        Ok(rows)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citesweep_domain::{CanonicalCitation, PromptSpec, ProviderKind, SweepCell};
    use tempfile::TempDir;

    fn cell(iteration: u32) -> SweepCell {
        SweepCell {
            provider: ProviderKind::Gemini,
            prompt: PromptSpec {
                prompt: "What happened, exactly?".into(),
                conflict: "conflict_a".into(),
                category: "neutral".into(),
                subcategory: "timeline".into(),
            },
            temperature: 0.7,
            iteration,
        }
    }

    fn records() -> Vec<QueryRecord> {
        vec![
            QueryRecord::success(
                &cell(1),
                Some("Answer".into()),
                vec![
                    CanonicalCitation::resolved("https://a.example/"),
                    CanonicalCitation::unresolved("https://proxy.example/x"),
                ],
                true,
            ),
            QueryRecord::success(&cell(2), None, vec![], true),
            QueryRecord::failure(&cell(3)),
        ]
    }

    #[test]
    fn test_json_sink_skips_failures() {
        let dir = TempDir::new().unwrap();
        let sink = JsonSink::new(dir.path().join("results.json"));

        assert_eq!(sink.write(&records()).unwrap(), 2);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(sink.path()).unwrap()).unwrap();
        let entries = written.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["model"], "gemini");
        assert_eq!(entries[0]["prompt"], "What happened, exactly?");
        assert_eq!(entries[0]["response"], "Answer");
        assert_eq!(entries[0]["tool_calling"], true);
        assert_eq!(entries[0]["citations"][1]["resolved"], false);
        assert_eq!(entries[1]["response"], serde_json::Value::Null);
        assert_eq!(entries[1]["citations"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_csv_sink_one_row_per_citation() {
        let dir = TempDir::new().unwrap();
        let sink = CsvSink::new(dir.path().join("results.csv"));

        assert_eq!(sink.write(&records()).unwrap(), 2);

        let contents = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "model,prompt,conflict,category,subcategory,temperature,iteration,citation"
        );
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "gemini,\"What happened, exactly?\",conflict_a,neutral,timeline,0.7,1,https://a.example/"
        );
    }

    #[test]
    fn test_csv_sink_without_citations_writes_header_only() {
        let dir = TempDir::new().unwrap();
        let sink = CsvSink::new(dir.path().join("empty.csv"));

        let only_empty = vec![QueryRecord::success(&cell(1), None, vec![], false)];
        assert_eq!(sink.write(&only_empty).unwrap(), 0);
        assert_eq!(fs::read_to_string(sink.path()).unwrap().lines().count(), 1);
    }
}
