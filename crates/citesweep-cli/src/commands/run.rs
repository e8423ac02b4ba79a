//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::{parse_models, Config};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::providers;
use crate::sink::{CsvSink, JsonSink, RecordSink};
use citesweep_domain::SweepCell;
use citesweep_extractor::{InferenceExtractor, ResponseExtractor};
use citesweep_pipeline::{
    flatten_catalog, CellOutcome, CitationNormalizer, SweepObserver, SweepPlan, SweepReport,
    SweepRunner,
};
use std::io::Write;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Prints per-cell progress to stdout.
pub struct ConsoleObserver<'a> {
    formatter: &'a Formatter,
    iterations: u32,
}

impl<'a> ConsoleObserver<'a> {
    /// Create an observer for a sweep with `iterations` per combination.
    pub fn new(formatter: &'a Formatter, iterations: u32) -> Self {
        Self {
            formatter,
            iterations,
        }
    }
}

impl SweepObserver for ConsoleObserver<'_> {
    fn on_cell_start(&mut self, _index: usize, _total: usize, cell: &SweepCell) {
        if cell.iteration == 1 {
            println!(
                "Running {} iterations for {} at temp {}",
                self.iterations, cell.provider, cell.temperature
            );
            println!("Prompt: {}...", truncate(&cell.prompt.prompt, 50));
        }
        print!("  Iteration {}/{} ", cell.iteration, self.iterations);
        let _ = std::io::stdout().flush();
    }

    fn on_cell_finish(&mut self, _index: usize, _total: usize, outcome: &CellOutcome) {
        match outcome.failure() {
            None => println!(
                "{}",
                self.formatter
                    .success(&format!("Found {} citations", outcome.record.citations.len()))
            ),
            Some(reason) => println!("{}", self.formatter.error(&format!("Failed: {}", reason))),
        }
    }

    fn on_finish(&mut self, report: &SweepReport) {
        if report.cancelled {
            println!(
                "{}",
                self.formatter.warning("Interrupted; saving the calls completed so far")
            );
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Execute the run command.
pub async fn execute_run(args: RunArgs, mut config: Config, formatter: &Formatter) -> Result<()> {
    if let Some(top_n) = args.top_n {
        config.sweep.top_n = Some(top_n);
    }
    if let Some(iterations) = args.iterations {
        config.sweep.iterations = iterations;
    }
    config
        .sweep
        .validate()
        .map_err(CliError::InvalidInput)?;

    let kinds = if args.models.is_empty() {
        config.provider_kinds()?
    } else {
        parse_models(&args.models)?
    };

    let prompts = flatten_catalog(&config.prompts, config.sweep.top_n);
    if prompts.is_empty() {
        return Err(CliError::Config("No prompts configured".to_string()));
    }
    if let Some(top_n) = config.sweep.top_n {
        println!("{}", formatter.info(&format!("Limited to first {} prompts", top_n)));
    }

    let search = providers::search_providers(&config, &kinds);
    if search.is_empty() {
        return Err(CliError::Config(
            "No provider could be initialised; check API keys".to_string(),
        ));
    }

    let extractor = ResponseExtractor::new(InferenceExtractor::new(
        providers::extraction_provider_or_unavailable(&config),
        config.extraction.limits.clone(),
    ));
    let normalizer = CitationNormalizer::new(providers::resolver(config.resolver.clone())?);
    let runner = SweepRunner::new(search, extractor, normalizer);

    let plan = SweepPlan::new(&runner.provider_kinds(), &prompts, &config.sweep);
    println!("Starting tool calling LLM calls:");
    println!(
        "  {} models, {} prompts, {} temperatures",
        runner.provider_kinds().len(),
        prompts.len(),
        config.sweep.temperatures.len()
    );
    println!(
        "  Running {} iterations per combination = {} total calls",
        config.sweep.iterations,
        plan.len()
    );
    println!();

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Shutdown signal received, finishing current call");
                cancel.cancel();
            }
        })
    };

    let mut observer = ConsoleObserver::new(formatter, config.sweep.iterations);
    let report = runner.run(&plan, &mut observer, &cancel).await;
    interrupt.abort();

    let json = JsonSink::new(args.output.unwrap_or_else(|| config.output.json.clone()));
    let saved = json.write(&report.records)?;
    if let Some(path) = args.csv.or_else(|| config.output.csv.clone()) {
        let csv = CsvSink::new(path);
        let rows = csv.write(&report.records)?;
        println!("{}", formatter.info(&format!("{} citation rows written to {}", rows, csv.path().display())));
    }

    let metrics = &report.metrics;
    println!("\nCompleted! Results saved to {}", json.path().display());
    println!("Total successful calls: {}", saved);
    println!("Total citations extracted: {}", metrics.citations);
    if metrics.succeeded > 0 {
        println!("Average citations per response: {:.2}", metrics.average_citations());
    }
    if metrics.failed > 0 {
        println!("{}", formatter.warning(&format!("{} calls failed", metrics.failed)));
    }
    info!("Sweep finished. Final metrics:\n{}", metrics.summary());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 50), "short");
        assert_eq!(truncate("ééééé", 3), "ééé");
    }
}
