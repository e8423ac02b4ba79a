//! Configuration file for the CLI.
//!
//! Everything a sweep needs lives in one TOML file (default
//! `citesweep.toml`): which models to query, the sweep dimensions, the
//! prompt catalog and per-crate settings. API keys stay in the environment.

use crate::error::{CliError, Result};
use citesweep_domain::ProviderKind;
use citesweep_extractor::ExtractorConfig;
use citesweep_llm::ProvidersConfig;
use citesweep_pipeline::{PromptCatalog, SweepConfig};
use citesweep_resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Providers to sweep, in order
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Sweep dimensions
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Extraction-by-inference settings
    #[serde(default)]
    pub extraction: ExtractionSettings,

    /// Redirect resolver settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Per-provider client settings
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputSettings,

    /// Prompt catalog: conflict → subcategory → prompts
    #[serde(default)]
    pub prompts: PromptCatalog,
}

/// Which structured-output backend infers citations, and its limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSettings {
    /// `chatgpt` or `ollama`
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Extractor limits
    #[serde(flatten)]
    pub limits: ExtractorConfig,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// JSON results file
    #[serde(default = "default_json_path")]
    pub json: PathBuf,

    /// Optional CSV file, one row per citation
    #[serde(default)]
    pub csv: Option<PathBuf>,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Load and validate the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a configuration string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.provider_kinds()?;
        self.extraction_backend()?;
        self.sweep
            .validate()
            .map_err(|e| CliError::Config(format!("sweep: {}", e)))?;
        self.extraction
            .limits
            .validate()
            .map_err(|e| CliError::Config(format!("extraction: {}", e)))?;
        self.resolver
            .validate()
            .map_err(|e| CliError::Config(format!("resolver: {}", e)))?;
        self.providers.validate().map_err(CliError::Config)?;
        Ok(())
    }

    /// Configured models as provider kinds, duplicates removed.
    pub fn provider_kinds(&self) -> Result<Vec<ProviderKind>> {
        parse_models(&self.models)
    }

    /// The structured-output backend used for inference.
    pub fn extraction_backend(&self) -> Result<ProviderKind> {
        match ProviderKind::parse(&self.extraction.backend) {
            Some(kind @ (ProviderKind::ChatGpt | ProviderKind::Ollama)) => Ok(kind),
            _ => Err(CliError::Config(format!(
                "extraction.backend must be 'chatgpt' or 'ollama', got '{}'",
                self.extraction.backend
            ))),
        }
    }
}

/// Parse model names, keeping first-seen order.
pub fn parse_models(models: &[String]) -> Result<Vec<ProviderKind>> {
    let mut kinds = Vec::with_capacity(models.len());
    for name in models {
        let kind = ProviderKind::parse(name)
            .ok_or_else(|| CliError::Config(format!("Unknown model '{}'", name)))?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.is_empty() {
        return Err(CliError::Config("models must not be empty".to_string()));
    }
    Ok(kinds)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: default_models(),
            sweep: SweepConfig::default(),
            extraction: ExtractionSettings::default(),
            resolver: ResolverConfig::default(),
            providers: ProvidersConfig::default(),
            output: OutputSettings::default(),
            prompts: PromptCatalog::default(),
        }
    }
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            limits: ExtractorConfig::default(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            json: default_json_path(),
            csv: None,
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_models() -> Vec<String> {
    vec!["claude".to_string(), "gemini".to_string(), "chatgpt".to_string()]
}

fn default_backend() -> String {
    "chatgpt".to_string()
}

fn default_json_path() -> PathBuf {
    PathBuf::from("llm_results.json")
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
