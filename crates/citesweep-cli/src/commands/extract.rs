//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::providers;
use citesweep_domain::{dedup_citations, CanonicalCitation};
use citesweep_extractor::InferenceExtractor;
use std::fs;

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: Config, formatter: &Formatter) -> Result<()> {
    let text = match (args.text, args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => {
            return Err(CliError::InvalidInput(
                "Provide --text or --file".to_string(),
            ))
        }
    };

    let extractor = InferenceExtractor::new(
        providers::extraction_provider(&config)?,
        config.extraction.limits,
    );
    let names = extractor.extract_names(&text).await?;
    let citations = dedup_citations(names.iter().map(CanonicalCitation::outlet));

    println!("{}", formatter.format_citations(&citations)?);
    Ok(())
}
