//! Configuration for a sweep

use serde::{Deserialize, Serialize};

/// Sweep dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Sampling temperatures to try for every prompt
    pub temperatures: Vec<f64>,

    /// Repetitions per (provider, prompt, temperature)
    #[serde(rename = "n")]
    pub iterations: u32,

    /// Only use the first `top_n` prompts of the catalog
    pub top_n: Option<usize>,
}

impl SweepConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.temperatures.is_empty() {
            return Err("temperatures must not be empty".to_string());
        }
        if let Some(t) = self
            .temperatures
            .iter()
            .find(|t| !t.is_finite() || **t < 0.0 || **t > 2.0)
        {
            return Err(format!("temperature out of range [0, 2]: {}", t));
        }
        if self.iterations == 0 {
            return Err("n must be greater than 0".to_string());
        }
        if self.top_n == Some(0) {
            return Err("top_n must be greater than 0 when set".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            temperatures: vec![0.0, 0.7, 1.0],
            iterations: 1,
            top_n: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SweepConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let mut config = SweepConfig::default();
        config.temperatures.clear();
        assert!(config.validate().is_err());

        let mut config = SweepConfig::default();
        config.temperatures.push(2.5);
        assert!(config.validate().is_err());

        let mut config = SweepConfig::default();
        config.iterations = 0;
        assert!(config.validate().is_err());

        let mut config = SweepConfig::default();
        config.top_n = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_uses_original_key_names() {
        let config = SweepConfig::from_toml(
            r#"
            temperatures = [0.2]
            n = 3
            top_n = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.temperatures, vec![0.2]);
        assert_eq!(config.iterations, 3);
        assert_eq!(config.top_n, Some(5));
    }
}
