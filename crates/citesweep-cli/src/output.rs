//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use citesweep_domain::{CanonicalCitation, ResolutionResult};
use citesweep_extractor::EvaluationReport;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format resolution outcomes, one per input URL.
    pub fn format_resolutions(&self, results: &[(String, ResolutionResult)]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = results
                    .iter()
                    .map(|(url, result)| {
                        serde_json::json!({
                            "url": url,
                            "resolved": result.is_resolved(),
                            "final_url": result.url(),
                            "reason": result.reason().map(|r| r.as_str()),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["URL", "Status", "Final URL"]);
                for (url, result) in results {
                    let status = match result.reason() {
                        None => self.colorize("resolved", "green"),
                        Some(reason) => self.colorize(reason.as_str(), "yellow"),
                    };
                    builder.push_record([url.as_str(), status.as_str(), result.url()]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format canonical citations.
    pub fn format_citations(&self, citations: &[CanonicalCitation]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = citations
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "source_url_or_name": c.source_url_or_name,
                            "resolved": c.resolved,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                if citations.is_empty() {
                    return Ok(self.colorize("No citations found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["#", "Source"]);
                for (i, citation) in citations.iter().enumerate() {
                    builder.push_record([(i + 1).to_string(), citation.source_url_or_name.clone()]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format an extraction evaluation report.
    pub fn format_evaluation(&self, report: &EvaluationReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let cases: Vec<serde_json::Value> = report
                    .outcomes
                    .iter()
                    .map(|o| {
                        serde_json::json!({
                            "description": o.description,
                            "passed": o.passed(),
                            "extracted": o.extracted,
                            "missing": o.missing,
                            "extra": o.extra,
                            "error": o.error,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "total": report.total(),
                    "passed": report.passed(),
                    "pass_rate": report.pass_rate(),
                    "cases": cases,
                }))?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Case", "Result", "Missing", "Extra"]);
                for outcome in &report.outcomes {
                    let result = match (&outcome.error, outcome.passed()) {
                        (Some(e), _) => self.colorize(&format!("error: {}", e), "red"),
                        (None, true) => self.colorize("pass", "green"),
                        (None, false) => self.colorize("fail", "red"),
                    };
                    builder.push_record([
                        outcome.description.to_string(),
                        result,
                        outcome.missing.join(", "),
                        outcome.extra.join(", "),
                    ]);
                }
                Ok(format!(
                    "{}\n{}",
                    self.render(builder),
                    self.info(&format!(
                        "Passed {}/{} ({:.1}%)",
                        report.passed(),
                        report.total(),
                        report.pass_rate() * 100.0
                    ))
                ))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citesweep_domain::UnresolvedReason;
    use citesweep_extractor::CaseOutcome;

    fn results() -> Vec<(String, ResolutionResult)> {
        vec![
            (
                "https://proxy/1".to_string(),
                ResolutionResult::Resolved("https://www.reuters.com/a".into()),
            ),
            (
                "https://proxy/2".to_string(),
                ResolutionResult::unresolved("https://proxy/2", UnresolvedReason::Timeout),
            ),
        ]
    }

    #[test]
    fn test_resolutions_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_resolutions(&results()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["final_url"], "https://www.reuters.com/a");
        assert_eq!(value[1]["resolved"], false);
        assert_eq!(value[1]["reason"], "timeout");
    }

    #[test]
    fn test_resolutions_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_resolutions(&results()).unwrap();
        assert!(output.contains("Final URL"));
        assert!(output.contains("https://www.reuters.com/a"));
        assert!(output.contains("timeout"));
    }

    #[test]
    fn test_empty_citations_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.format_citations(&[]).unwrap(), "No citations found.");
    }

    #[test]
    fn test_evaluation_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let report = EvaluationReport {
            outcomes: vec![CaseOutcome {
                description: "Explicit attributions",
                extracted: vec!["CNN".into()],
                missing: vec!["BBC".into()],
                extra: vec![],
                error: None,
            }],
        };
        let output = formatter.format_evaluation(&report).unwrap();
        assert!(output.contains("fail"));
        assert!(output.contains("BBC"));
        assert!(output.contains("Passed 0/1"));
    }

    #[test]
    fn test_plain_messages_without_color() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.error("bad"), "✗ bad");
    }
}
