//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// citesweep - Sweep search-augmented LLMs and collect the sources they cite.
#[derive(Debug, Parser)]
#[command(name = "citesweep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CITESWEEP_CONFIG", default_value = "citesweep.toml")]
    pub config: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full provider × prompt × temperature × iteration sweep
    Run(RunArgs),

    /// Resolve URLs through the redirect resolver
    Resolve(ResolveArgs),

    /// Infer cited outlets from free text
    Extract(ExtractArgs),

    /// Score the extraction model against the built-in cases
    Evaluate,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Providers to query (overrides `models` in the config)
    #[arg(short, long = "model", value_name = "MODEL")]
    pub models: Vec<String>,

    /// Only use the first N prompts
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Iterations per (model, prompt, temperature)
    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    /// JSON results file (overrides `output.json`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write one CSV row per citation to this file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Arguments for the resolve command.
#[derive(Debug, Parser)]
pub struct ResolveArgs {
    /// URLs to resolve
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Stop at the first redirect instead of following the chain
    #[arg(long)]
    pub single_hop: bool,

    /// Per-URL timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Text to analyse
    #[arg(short, long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short = 'i', long)]
    pub file: Option<PathBuf>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from(["citesweep", "run", "-m", "claude", "-m", "gemini", "-n", "3"]);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.models, vec!["claude", "gemini"]);
                assert_eq!(args.iterations, Some(3));
                assert!(args.csv.is_none());
            }
            _ => panic!("Expected Run command"),
        }
        assert_eq!(cli.config, PathBuf::from("citesweep.toml"));
    }

    #[test]
    fn test_resolve_requires_urls() {
        assert!(Cli::try_parse_from(["citesweep", "resolve"]).is_err());

        let cli = Cli::parse_from(["citesweep", "--format", "json", "resolve", "https://a/", "--single-hop"]);
        match cli.command {
            Command::Resolve(args) => {
                assert_eq!(args.urls, vec!["https://a/"]);
                assert!(args.single_hop);
            }
            _ => panic!("Expected Resolve command"),
        }
    }

    #[test]
    fn test_extract_text_and_file_conflict() {
        assert!(Cli::try_parse_from(["citesweep", "extract", "-t", "x", "-i", "f.txt"]).is_err());
    }

    #[test]
    fn test_format_conversion() {
        let format: crate::config::OutputFormat = CliFormat::Json.into();
        assert!(matches!(format, crate::config::OutputFormat::Json));
    }
}
