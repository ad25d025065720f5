//! Persistent defaults for the CLI
//!
//! Stored as TOML under the user's config directory. Secrets are never
//! written here; tokens come from flags or the environment (`.env` supported).

use crate::api::constants::DEFAULT_BASE_URL;
use crate::api::resilience::{RateLimitConfig, ResilienceConfig};
use crate::duplicate::job::{DEFAULT_NAME_FIELDS, DEFAULT_PROTECTED_ENVIRONMENTS};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Management token for the source (and, by default, the target) space
pub const TOKEN_ENV: &str = "CONTENTFUL_MANAGEMENT_TOKEN";

/// Management token for a different target space
pub const TARGET_TOKEN_ENV: &str = "CONTENTFUL_TARGET_MANAGEMENT_TOKEN";

/// Default space id
pub const SPACE_ID_ENV: &str = "CONTENTFUL_SPACE_ID";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub space_id: Option<String>,
    pub environment: String,
    pub target_environment: Option<String>,
    pub name_fields: Vec<String>,
    pub protected_environments: Vec<String>,
    pub api: ApiSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub requests_per_minute: u32,
    pub max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            space_id: None,
            environment: "develop".to_string(),
            target_environment: None,
            name_fields: DEFAULT_NAME_FIELDS.iter().map(|s| s.to_string()).collect(),
            protected_environments: DEFAULT_PROTECTED_ENVIRONMENTS.iter().map(|s| s.to_string()).collect(),
            api: ApiSettings::default(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        let rate_limit = RateLimitConfig::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            requests_per_minute: rate_limit.requests_per_minute,
            max_retries: 3,
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("contentful-duplicate")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".contentful-duplicate")
        };

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Missing file yields the defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
                info!("Created config directory: {:?}", config_dir);
            }
        }

        let config_content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        debug!("Saved config to: {:?}", config_path);
        Ok(())
    }

    pub fn resilience(&self) -> ResilienceConfig {
        ResilienceConfig::builder()
            .max_attempts(self.api.max_retries.saturating_add(1))
            .requests_per_minute(self.api.requests_per_minute)
            .enable_rate_limiting(self.api.requests_per_minute > 0)
            .build()
    }
}

/// Read a variable from the process environment, loading `.env` first
pub fn env_value(name: &str) -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
