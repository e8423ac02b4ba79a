//! citesweep CLI library.
//!
//! Configuration loading, provider construction, command execution, result
//! sinks and output formatting for the `citesweep` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod providers;
pub mod sink;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use sink::{CsvSink, JsonSink, RecordSink};
