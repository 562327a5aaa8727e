//! Configuration management for stackbuddy
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.stackbuddy/config.toml

use crate::errors::{BuddyError, Result};
use crate::streaming::client::{
    DEFAULT_TEMPERATURE, LM_STUDIO_DEFAULT_ENDPOINT, LM_STUDIO_DEFAULT_MODEL_NAME,
};
use crate::types::MaxTokens;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Log levels accepted in `[logging] level`
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Complete configuration for stackbuddy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// LM Studio connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    /// `-1` means no limit
    pub max_tokens: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: LM_STUDIO_DEFAULT_ENDPOINT.to_string(),
            model: LM_STUDIO_DEFAULT_MODEL_NAME.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: -1,
        }
    }
}

impl AiConfig {
    pub fn max_tokens(&self) -> MaxTokens {
        MaxTokens::from_wire(self.max_tokens)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| BuddyError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| BuddyError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard configuration file location
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".stackbuddy").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.ai.endpoint.trim().is_empty() {
            return Err(BuddyError::ConfigError("endpoint must not be empty".to_string()));
        }

        if self.ai.model.trim().is_empty() {
            return Err(BuddyError::ConfigError("model must not be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(BuddyError::ConfigError(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.ai.max_tokens == 0 || self.ai.max_tokens < -1 {
            return Err(BuddyError::ConfigError(
                "max_tokens must be positive, or -1 for no limit".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(BuddyError::ConfigError(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| BuddyError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BuddyError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| BuddyError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ai.endpoint, "http://127.0.0.1:1234");
        assert_eq!(config.ai.model, "default");
        assert_eq!(config.ai.max_tokens(), MaxTokens::Unlimited);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_temperature() {
        let mut config = Config::default();
        config.ai.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_max_tokens() {
        let mut config = Config::default();
        config.ai.max_tokens = 0;
        assert!(config.validate().is_err());

        config.ai.max_tokens = -5;
        assert!(config.validate().is_err());

        config.ai.max_tokens = 256;
        assert!(config.validate().is_ok());
        assert_eq!(config.ai.max_tokens(), MaxTokens::Limit(256));
    }

    #[test]
    fn test_config_validation_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[ai]\nmodel = \"phi-3\"\n").unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.ai.model, "phi-3");
        assert_eq!(config.ai.endpoint, LM_STUDIO_DEFAULT_ENDPOINT);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ai.endpoint = "http://10.0.0.2:1234/v1".to_string();
        config.ai.max_tokens = 1024;
        config.save(&path).unwrap();

        let reloaded = Config::load_from_file(&path).unwrap();
        assert_eq!(reloaded.ai.endpoint, "http://10.0.0.2:1234/v1");
        assert_eq!(reloaded.ai.max_tokens, 1024);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[ai\nmodel = ").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, BuddyError::ConfigError(_)));
    }
}
