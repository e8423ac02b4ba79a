//! Evaluate command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::providers;
use citesweep_extractor::{evaluate, InferenceExtractor, EVALUATION_CASES};

/// Execute the evaluate command.
pub async fn execute_evaluate(config: Config, formatter: &Formatter) -> Result<()> {
    let extractor = InferenceExtractor::new(
        providers::extraction_provider(&config)?,
        config.extraction.limits,
    );

    println!(
        "{}",
        formatter.info(&format!(
            "Evaluating {} extraction on {} cases",
            config.extraction.backend,
            EVALUATION_CASES.len()
        ))
    );
    let report = evaluate(&extractor, EVALUATION_CASES).await;

    println!("{}", formatter.format_evaluation(&report)?);
    Ok(())
}
