//! Extraction evaluation harness
//!
//! Canned texts with known outlet sets, used to check an extraction model
//! before trusting it with a sweep. Comparison is by set: order and
//! duplicates do not matter.

use crate::inference::InferenceExtractor;
use citesweep_domain::traits::StructuredOutputProvider;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// One evaluation case
#[derive(Debug, Clone, Copy)]
pub struct EvaluationCase {
    /// What the case exercises
    pub description: &'static str,

    /// Text handed to the extractor
    pub text: &'static str,

    /// Exact outlet set the extractor should return
    pub expected: &'static [&'static str],
}

/// Built-in evaluation cases
pub const EVALUATION_CASES: &[EvaluationCase] = &[
    EvaluationCase {
        description: "Basic news outlet mentions",
        text: "According to CNN, the conflict began in 2022. BBC reported similar findings, while Reuters confirmed the timeline.",
        expected: &["CNN", "BBC", "Reuters"],
    },
    EvaluationCase {
        description: "Newspaper citations with articles",
        text: "The New York Times published an investigation, and The Guardian provided additional context. The Wall Street Journal also covered the story.",
        expected: &["New York Times", "The Guardian", "Wall Street Journal"],
    },
    EvaluationCase {
        description: "Generic references - should extract nothing",
        text: "Multiple sources suggest that recent reports indicate significant developments. Experts agree on the findings.",
        expected: &[],
    },
    EvaluationCase {
        description: "Web sources",
        text: "Wikipedia states that the population is growing. According to Google News aggregation, the trend continues.",
        expected: &["Wikipedia", "Google News"],
    },
    EvaluationCase {
        description: "Government and organization acronyms",
        text: "The CDC released guidelines while the FDA announced new regulations. NATO sources confirmed the information.",
        expected: &["CDC", "FDA", "NATO"],
    },
    EvaluationCase {
        description: "Vague references without specific names",
        text: "Studies show that news outlets have reported extensively on this topic.",
        expected: &[],
    },
    EvaluationCase {
        description: "Mixed news sources",
        text: "As reported by Associated Press and confirmed by Al Jazeera, the situation remains fluid. NPR also covered the story.",
        expected: &["Associated Press", "Al Jazeera", "NPR"],
    },
    EvaluationCase {
        description: "Academic sources",
        text: "The Harvard study, published in Nature, cited previous work from MIT researchers.",
        expected: &["Harvard", "Nature", "MIT"],
    },
    EvaluationCase {
        description: "Academic-style vague references",
        text: "According to recent analysis, sources indicate widespread agreement among experts in the field.",
        expected: &[],
    },
    EvaluationCase {
        description: "TV news networks",
        text: "Fox News and MSNBC offered contrasting perspectives, while CBS News provided balanced coverage.",
        expected: &["Fox News", "MSNBC", "CBS News"],
    },
];

/// Result of running one case
#[derive(Debug, Clone, PartialEq)]
pub struct CaseOutcome {
    /// The case that was run
    pub description: &'static str,

    /// Names the extractor returned
    pub extracted: Vec<String>,

    /// Expected names the extractor missed
    pub missing: Vec<String>,

    /// Returned names that were not expected
    pub extra: Vec<String>,

    /// Extraction error, if the call itself failed
    pub error: Option<String>,
}

impl CaseOutcome {
    fn compare(case: &EvaluationCase, extracted: Vec<String>, error: Option<String>) -> Self {
        let expected: BTreeSet<&str> = case.expected.iter().copied().collect();
        let got: BTreeSet<&str> = extracted.iter().map(String::as_str).collect();

        let missing = expected.difference(&got).map(|s| s.to_string()).collect();
        let extra = got.difference(&expected).map(|s| s.to_string()).collect();

        Self {
            description: case.description,
            extracted,
            missing,
            extra,
            error,
        }
    }

    /// Whether the extracted set equals the expected set
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Results of an evaluation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationReport {
    /// One outcome per case, in case order
    pub outcomes: Vec<CaseOutcome>,
}

impl EvaluationReport {
    /// Number of cases run
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of cases that passed
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    /// Share of passing cases, as a percentage
    pub fn pass_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.passed() as f64 / self.total() as f64 * 100.0
        }
    }

    /// Whether every case passed
    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }
}

/// Run `cases` through the extractor
pub async fn evaluate<P: StructuredOutputProvider>(
    extractor: &InferenceExtractor<P>,
    cases: &[EvaluationCase],
) -> EvaluationReport {
    let mut outcomes = Vec::with_capacity(cases.len());

    for (idx, case) in cases.iter().enumerate() {
        let outcome = match extractor.extract_names(case.text).await {
            Ok(names) => CaseOutcome::compare(
                case,
                names.into_iter().map(|n| n.into_inner()).collect(),
                None,
            ),
            Err(e) => {
                warn!("Evaluation case {} failed: {}", idx + 1, e);
                CaseOutcome::compare(case, Vec::new(), Some(e.to_string()))
            }
        };
        outcomes.push(outcome);
    }

    let report = EvaluationReport { outcomes };
    info!(
        "Evaluation complete: {}/{} passed ({:.1}%)",
        report.passed(),
        report.total(),
        report.pass_rate()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractorConfig;
    use citesweep_llm::MockProvider;

    /// A mock that answers every case correctly
    fn oracle() -> MockProvider {
        let mut provider = MockProvider::default();
        for case in EVALUATION_CASES {
            let body = serde_json::json!({ "citations": case.expected }).to_string();
            provider.add_response(case.text, body);
        }
        provider
    }

    #[test]
    fn test_ten_builtin_cases() {
        assert_eq!(EVALUATION_CASES.len(), 10);
        assert_eq!(EVALUATION_CASES.iter().filter(|c| c.expected.is_empty()).count(), 3);
    }

    #[tokio::test]
    async fn test_oracle_passes_everything() {
        let extractor = InferenceExtractor::new(oracle(), ExtractorConfig::default());
        let report = evaluate(&extractor, EVALUATION_CASES).await;

        assert_eq!(report.total(), 10);
        assert!(report.all_passed());
        assert_eq!(report.pass_rate(), 100.0);
    }

    #[tokio::test]
    async fn test_missing_and_extra_are_reported() {
        let case = EVALUATION_CASES[0];
        let mut provider = MockProvider::default();
        provider.add_response(case.text, r#"{"citations": ["BBC", "Reuters", "timeline"]}"#);
        let extractor = InferenceExtractor::new(provider, ExtractorConfig::default());

        let report = evaluate(&extractor, &[case]).await;
        let outcome = &report.outcomes[0];

        assert!(!outcome.passed());
        assert_eq!(outcome.missing, vec!["CNN"]);
        assert_eq!(outcome.extra, vec!["timeline"]);
        assert_eq!(report.pass_rate(), 0.0);
    }

    #[tokio::test]
    async fn test_order_does_not_matter() {
        let case = EVALUATION_CASES[4];
        let mut provider = MockProvider::default();
        provider.add_response(case.text, r#"{"citations": ["NATO", "CDC", "FDA"]}"#);
        let extractor = InferenceExtractor::new(provider, ExtractorConfig::default());

        assert!(evaluate(&extractor, &[case]).await.all_passed());
    }

    #[tokio::test]
    async fn test_provider_error_fails_case() {
        let case = EVALUATION_CASES[1];
        let mut provider = MockProvider::default();
        provider.add_error(case.text);
        let extractor = InferenceExtractor::new(provider, ExtractorConfig::default());

        let report = evaluate(&extractor, &[case]).await;
        assert!(report.outcomes[0].error.is_some());
        assert_eq!(report.passed(), 0);
    }
}
