//! Configuration management
//!
//! One TOML file with a section per pipeline stage. Missing sections and
//! missing keys fall back to the canonical run (800 employees, seed 123,
//! 70/30 split, 600 trees).

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::data::GeneratorOptions;
use crate::error::Result;
use crate::models::ForestConfig;
use crate::training::TrainingConfig;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub population: GeneratorOptions,
    pub training: TrainingConfig,
    pub forest: ForestConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file or use default
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Using default configuration");
                Self::default()
            }
        }
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Create default configuration file
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<()> {
        Config::default().save(path)
    }

    pub fn validate(&self) -> Result<()> {
        self.population.validate()?;
        self.training.validate()?;
        self.forest.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::features::FeatureSet;
    use crate::models::MaxFeatures;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.population.n, 800);
        assert_eq!(config.population.seed, 123);
        assert_eq!(config.training.test_ratio, 0.3);
        assert_eq!(config.forest.n_trees, 600);
        assert_eq!(config.forest.max_depth, None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.population, config.population);
        assert_eq!(parsed.training, config.training);
        assert_eq!(parsed.forest.n_trees, config.forest.n_trees);
        assert_eq!(parsed.forest.max_features, MaxFeatures::Sqrt);
    }

    #[test]
    fn test_partial_document() {
        let config = Config::from_toml(
            r#"
[training]
features = "extended"

[forest]
n_trees = 50
max_depth = 8
"#,
        )
        .unwrap();
        assert_eq!(config.population.n, 800);
        assert_eq!(config.training.features, FeatureSet::Extended);
        assert_eq!(config.forest.n_trees, 50);
        assert_eq!(config.forest.max_depth, Some(8));
        assert!(config.forest.bootstrap);
    }

    #[test]
    fn test_rejects_empty_population() {
        let result = Config::from_toml("[population]\nn = 0\n");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_non_integer_seed() {
        let result = Config::from_toml("[population]\nseed = \"abc\"\n");
        assert!(matches!(result, Err(Error::TomlDe(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("impulso.toml");
        Config::create_default(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.population, GeneratorOptions::default());
        assert_eq!(loaded.logging, LoggingConfig::default());
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(config.forest.n_trees, 600);
    }
}
