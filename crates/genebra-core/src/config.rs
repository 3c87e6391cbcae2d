//! Configuration management for Genebra
//!
//! Handles loading, saving, and managing application configuration
//! including the backend address and completion API settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default intranet backend serving `/login`, `/ask` and `/upload`
pub const DEFAULT_BACKEND_URL: &str = "https://intranet-genebra.onrender.com";

/// Default generative API base (the model name is appended per request)
pub const DEFAULT_COMPLETION_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default completion model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Intranet backend settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Completion API settings
    #[serde(default)]
    pub completion: CompletionConfig,
    /// General application settings
    #[serde(default)]
    pub general: GeneralConfig,
}

impl Config {
    /// Check that the configured URLs parse and use http(s)
    pub fn validate(&self) -> Result<()> {
        check_http_url("backend.base_url", &self.backend.base_url)?;
        check_http_url("completion.base_url", &self.completion.base_url)?;
        if self.completion.model.trim().is_empty() {
            return Err(Error::Config("completion.model must not be empty".to_string()));
        }
        Ok(())
    }
}

fn check_http_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| Error::Config(format!("Invalid {}: {}", field, e)))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Error::Config(format!(
            "{} must use http or https, got {}",
            field,
            parsed.scheme()
        )));
    }
    Ok(())
}

/// Intranet backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

/// Completion API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL for the generative API
    pub base_url: String,
    /// Model to use
    pub model: String,
    /// API key (can be loaded from env)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable name for API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COMPLETION_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_key_env: Some("GEMINI_API_KEY".to_string()),
        }
    }
}

impl CompletionConfig {
    /// Get the API key, checking environment variable if not set directly
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }

        if let Some(env_name) = &self.api_key_env {
            if let Ok(key) = std::env::var(env_name) {
                if !key.is_empty() {
                    return Some(key);
                }
            }
        }

        std::env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty())
    }
}

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    pub log_level: String,
    /// Where the local key/value storage file lives.
    /// Defaults to `<data_dir>/genebra/local_storage.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            storage_path: None,
        }
    }
}

/// Configuration manager for loading and saving config
pub struct ConfigManager {
    config_path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::with_path(config_path)
    }

    /// Create a config manager with a specific path
    pub fn with_path(config_path: PathBuf) -> Result<Self> {
        let config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            Config::default()
        };

        Ok(Self { config_path, config })
    }

    /// Get the default config path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("genebra").join("config.toml"))
    }

    fn load_from_path(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Path this manager reads from and saves to
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable access to configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Save the current configuration to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(&self.config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&self.config_path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Override the backend URL
    pub fn set_backend_url(&mut self, url: impl Into<String>) {
        self.config.backend.base_url = url.into();
    }

    /// Override the completion model
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.config.completion.model = model.into();
    }

    /// Get the completion API key
    pub fn get_api_key(&self) -> Option<String> {
        self.config.completion.get_api_key()
    }

    /// Check if a completion API key is configured
    pub fn has_api_key(&self) -> bool {
        self.get_api_key().is_some()
    }
}
