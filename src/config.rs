use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub language: Option<String>,

    /// Input device index; when unset the device is chosen interactively.
    #[serde(default)]
    pub device: Option<usize>,

    #[serde(default = "default_typing_start_delay_secs")]
    pub typing_start_delay_secs: u64,

    #[serde(default = "default_typing_key_delay_ms")]
    pub typing_key_delay_ms: u32,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "whisper-1".to_string()
}

fn default_typing_start_delay_secs() -> u64 {
    5
}

fn default_typing_key_delay_ms() -> u32 {
    25
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            model: default_model(),
            language: None,
            device: None,
            typing_start_delay_secs: default_typing_start_delay_secs(),
            typing_key_delay_ms: default_typing_key_delay_ms(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.config/parlance/config.json)
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!(
                "Config file not found at {:?}, creating default config",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        tracing::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config")
        };

        Ok(config_dir.join("parlance").join("config.json"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            return Err(anyhow::anyhow!("api_url cannot be empty"));
        }

        if self.model.is_empty() {
            return Err(anyhow::anyhow!("model cannot be empty"));
        }

        if self.api_key.is_empty() {
            return Err(anyhow::anyhow!(
                "api_key is not set; add it to {:?}",
                Self::config_path()?
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_falls_back_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.api_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "whisper-1");
        assert_eq!(config.device, None);
        assert_eq!(config.typing_start_delay_secs, 5);
        assert_eq!(config.typing_key_delay_ms, 25);
    }

    #[test]
    fn validate_requires_an_api_key() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let config = Config {
            api_key: "sk-test".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
