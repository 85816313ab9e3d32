//! Configuration management for NILM CLI
//!
//! Stores API key, user and dashboard defaults in ~/.config/nilm/config.toml.
//! `NILM_API_KEY`, `NILM_BASE_URL` and `NILM_USER_ID` override the file.

use anyhow::{bail, Context, Result};
use nilm::ChatSessionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_DIR: &str = "nilm";
const CONFIG_FILE: &str = "config.toml";

/// CLI Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Owner of the chat transcript
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default = "default_house")]
    pub default_house: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// 0 waits forever
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_house() -> String {
    "1".to_string()
}

fn default_temperature() -> f32 {
    nilm::ports::DEFAULT_TEMPERATURE
}

fn default_generation_timeout() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            user_id: None,
            default_house: default_house(),
            temperature: default_temperature(),
            generation_timeout_secs: default_generation_timeout(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file (or defaults), then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load config from file only, or create default
    pub fn load_file() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config file")
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Overlay non-empty values from `lookup` (the environment in practice)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("NILM_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup("NILM_BASE_URL") {
            self.base_url = url;
        }
        if let Some(user) = lookup("NILM_USER_ID") {
            self.user_id = Some(user);
        }
    }

    /// Set API key
    pub fn set_api_key(&mut self, key: String) {
        self.api_key = Some(key);
    }

    /// Set the sampling temperature; must lie in [0, 1]
    pub fn set_temperature(&mut self, temperature: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&temperature) {
            bail!("Temperature must be between 0 and 1, got {}", temperature);
        }
        self.temperature = temperature;
        Ok(())
    }

    /// Set the default house; must be one of the known houses
    pub fn set_default_house(&mut self, house: String) -> Result<()> {
        if !nilm::domain::HOUSES.contains(&house.as_str()) {
            bail!(
                "Unknown house '{}'. Choose one of {}",
                house,
                nilm::domain::HOUSES.join(", ")
            );
        }
        self.default_house = house;
        Ok(())
    }

    /// The user owning the transcript, or a hint on how to set one
    pub fn require_user(&self) -> Result<&str> {
        self.user_id
            .as_deref()
            .context("No user configured. Run 'nilm config --user <id>' or set NILM_USER_ID.")
    }

    pub fn session_config(&self) -> ChatSessionConfig {
        ChatSessionConfig {
            temperature: self.temperature,
            generation_timeout: match self.generation_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            ..ChatSessionConfig::default()
        }
    }
}
