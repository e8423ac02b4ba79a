//! Builds provider clients and the resolver from configuration.

use crate::config::Config;
use crate::error::{CliError, Result};
use citesweep_domain::traits::{SearchProvider, StructuredOutputProvider};
use citesweep_domain::ProviderKind;
use citesweep_llm::{AnthropicProvider, GeminiProvider, LlmError, OllamaProvider, OpenAiProvider};
use async_trait::async_trait;
use citesweep_resolver::{BrowserRedirectResolver, ChromiumLauncher, ResolverConfig};
use tracing::{info, warn};

/// Any search provider, boxed so a sweep can mix backends.
pub type DynSearchProvider = Box<dyn SearchProvider<Error = LlmError>>;

/// Any structured-output provider.
pub type DynStructuredProvider = Box<dyn StructuredOutputProvider<Error = LlmError>>;

/// Build the client for one backend.
///
/// Hosted backends fail here when their API key is missing.
pub fn search_provider(config: &Config, kind: ProviderKind) -> Result<DynSearchProvider> {
    let providers = &config.providers;
    let provider: DynSearchProvider = match kind {
        ProviderKind::Claude => Box::new(AnthropicProvider::from_env(providers.claude())?),
        ProviderKind::Gemini => Box::new(GeminiProvider::from_env(providers.gemini())?),
        ProviderKind::ChatGpt => Box::new(OpenAiProvider::from_env(providers.chatgpt())?),
        ProviderKind::Ollama => Box::new(OllamaProvider::with_settings(providers.ollama())?),
    };
    Ok(provider)
}

/// Build clients for `kinds`, skipping (with a warning) any that cannot be built.
pub fn search_providers(config: &Config, kinds: &[ProviderKind]) -> Vec<DynSearchProvider> {
    kinds
        .iter()
        .filter_map(|kind| match search_provider(config, *kind) {
            Ok(provider) => Some(provider),
            Err(e) => {
                warn!(provider = %kind, "Skipping provider: {}", e);
                None
            }
        })
        .collect()
}

/// Build the structured-output backend used for citation inference.
pub fn extraction_provider(config: &Config) -> Result<DynStructuredProvider> {
    let provider: DynStructuredProvider = match config.extraction_backend()? {
        ProviderKind::ChatGpt => Box::new(OpenAiProvider::from_env(config.providers.chatgpt())?),
        ProviderKind::Ollama => Box::new(OllamaProvider::with_settings(config.providers.ollama())?),
        other => {
            return Err(CliError::Config(format!(
                "{} cannot be used for extraction",
                other
            )))
        }
    };
    info!(backend = %config.extraction.backend, "extraction backend ready");
    Ok(provider)
}

/// Stand-in extraction backend that refuses every request.
///
/// Inference through it yields no citations, so responses with native
/// citation metadata still go through.
#[derive(Debug, Clone)]
pub struct UnavailableExtraction {
    reason: String,
}

impl UnavailableExtraction {
    /// Create a stand-in that reports `reason` on every call.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl StructuredOutputProvider for UnavailableExtraction {
    type Error = LlmError;

    async fn generate_structured(
        &self,
        _prompt: &str,
        _schema: &str,
    ) -> std::result::Result<String, LlmError> {
        Err(LlmError::Config(format!(
            "Extraction backend unavailable: {}",
            self.reason
        )))
    }
}

/// Build the extraction backend, or a stand-in when it cannot be built.
pub fn extraction_provider_or_unavailable(config: &Config) -> DynStructuredProvider {
    match extraction_provider(config) {
        Ok(provider) => provider,
        Err(e) => {
            warn!(
                backend = %config.extraction.backend,
                "Extraction backend unavailable, text-only answers will have no citations: {}",
                e
            );
            Box::new(UnavailableExtraction::new(e.to_string()))
        }
    }
}

/// Build the browser-backed redirect resolver.
pub fn resolver(config: ResolverConfig) -> Result<BrowserRedirectResolver<ChromiumLauncher>> {
    let launcher = ChromiumLauncher::new(&config);
    Ok(BrowserRedirectResolver::new(launcher, config)?)
}
