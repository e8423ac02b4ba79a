//! citesweep - Citation sweep across search-augmented LLMs.

use citesweep_cli::commands;
use citesweep_cli::{Cli, Command, Config, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Log to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run() -> citesweep_cli::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    // Only `run` needs prompts; the other commands work with defaults
    let config = if cli.config.exists() || matches!(cli.command, Command::Run(_)) {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    let format = cli.format.map(Into::into).unwrap_or(config.output.format);
    let color_enabled = !cli.no_color && config.output.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Run(args) => commands::execute_run(args, config, &formatter).await?,
        Command::Resolve(args) => commands::execute_resolve(args, config, &formatter).await?,
        Command::Extract(args) => commands::execute_extract(args, config, &formatter).await?,
        Command::Evaluate => commands::execute_evaluate(config, &formatter).await?,
    }

    Ok(())
}
