//! Configuration for the Resolver

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Prefix of Gemini grounding redirect links
pub const GROUNDING_REDIRECT_PREFIX: &str =
    "https://vertexaisearch.cloud.google.com/grounding-api-redirect/";

/// Configuration for redirect resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// URL prefixes that identify indirection links
    ///
    /// Anything else is already final and never opens a browser.
    pub indirection_prefixes: Vec<String>,

    /// Hard limit for a single resolution (seconds)
    ///
    /// Covers browser launch, event subscription and navigation.
    pub timeout_secs: u64,

    /// How long to keep listening after navigation completes (milliseconds)
    pub settle_millis: u64,

    /// Maximum number of browser sessions alive at once
    pub max_concurrent_sessions: usize,

    /// Follow multi-hop chains to the terminal URL
    ///
    /// When false, the first redirect target is taken as final.
    pub follow_redirect_chain: bool,

    /// Run the browser without a window
    pub headless: bool,

    /// Pass `--no-sandbox` to the browser (needed when running as root)
    pub no_sandbox: bool,

    /// Browser executable; autodetected when unset
    pub chrome_executable: Option<PathBuf>,
}

impl ResolverConfig {
    /// Get the resolution timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the settle window as a Duration
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_millis)
    }

    /// Whether `url` is an indirection link that needs a browser
    pub fn is_indirection(&self, url: &str) -> bool {
        self.indirection_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix.as_str()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.indirection_prefixes.is_empty() {
            return Err("indirection_prefixes must not be empty".to_string());
        }
        if let Some(prefix) = self
            .indirection_prefixes
            .iter()
            .find(|p| !(p.starts_with("http://") || p.starts_with("https://")))
        {
            return Err(format!("indirection prefix must be an http(s) URL: {}", prefix));
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_concurrent_sessions == 0 {
            return Err("max_concurrent_sessions must be greater than 0".to_string());
        }
        if self.settle() >= self.timeout() {
            return Err("settle_millis must be shorter than the timeout".to_string());
        }
        Ok(())
    }

    /// Aggressive preset: short timeout, more parallel sessions
    pub fn aggressive() -> Self {
        Self {
            timeout_secs: 10,
            settle_millis: 200,
            max_concurrent_sessions: 8,
            ..Self::default()
        }
    }

    /// Lenient preset: long timeout for slow destinations, fewer sessions
    pub fn lenient() -> Self {
        Self {
            timeout_secs: 60,
            settle_millis: 1_000,
            max_concurrent_sessions: 2,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            indirection_prefixes: vec![GROUNDING_REDIRECT_PREFIX.to_string()],
            timeout_secs: 30,
            settle_millis: 500,
            max_concurrent_sessions: 4,
            follow_redirect_chain: true,
            headless: true,
            no_sandbox: false,
            chrome_executable: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(ResolverConfig::default().validate().is_ok());
        assert!(ResolverConfig::aggressive().validate().is_ok());
        assert!(ResolverConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(ResolverConfig::default().timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_is_indirection() {
        let config = ResolverConfig::default();
        assert!(config.is_indirection(
            "https://vertexaisearch.cloud.google.com/grounding-api-redirect/AUZIYQ"
        ));
        assert!(!config.is_indirection("https://www.reuters.com/world/"));
        assert!(!config.is_indirection("Reuters"));
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = ResolverConfig::default();
        config.indirection_prefixes.clear();
        assert!(config.validate().is_err());

        let mut config = ResolverConfig::default();
        config.indirection_prefixes = vec!["vertexaisearch".to_string()];
        assert!(config.validate().is_err());

        let mut config = ResolverConfig::default();
        config.max_concurrent_sessions = 0;
        assert!(config.validate().is_err());

        let mut config = ResolverConfig::default();
        config.settle_millis = 30_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml() {
        let config = ResolverConfig::from_toml(
            r#"
            timeout_secs = 5
            follow_redirect_chain = false
            "#,
        )
        .unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert!(!config.follow_redirect_chain);
        assert_eq!(config.indirection_prefixes, vec![GROUNDING_REDIRECT_PREFIX]);
    }
}
