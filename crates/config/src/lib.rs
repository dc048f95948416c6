//! Configuration loading, validation, and management for Hireline.
//!
//! Loads configuration from `~/.hireline/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use hireline_core::AUTHORIZED_SIGNATORIES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.hireline/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the selected provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// LLM provider ("anthropic" or "openai")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier passed to the provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL override (for OpenAI-compatible gateways)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Maximum tool round-trips within one conversational turn
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u32,

    /// Intake behavior settings
    #[serde(default)]
    pub intake: IntakeConfig,
}

fn default_provider() -> String {
    "anthropic".into()
}
fn default_model() -> String {
    "claude-sonnet-4-20250514".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_max_tool_rounds() -> u32 {
    5
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .field("intake", &self.intake)
            .finish()
    }
}

/// Settings governing one intake session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// People allowed to sign contracts. Empty = built-in list.
    #[serde(default)]
    pub authorized_signatories: Vec<String>,

    /// Override the system prompt entirely (skips file loading)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,

    /// Load the system prompt from a file (absolute path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_file: Option<String>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            authorized_signatories: vec![],
            system_prompt_override: None,
            system_prompt_file: None,
        }
    }
}

impl IntakeConfig {
    /// The effective signatory list: configured names, or the built-in set.
    pub fn signatories(&self) -> Vec<String> {
        if self.authorized_signatories.is_empty() {
            AUTHORIZED_SIGNATORIES.iter().map(|s| s.to_string()).collect()
        } else {
            self.authorized_signatories.clone()
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.hireline/config.toml).
    ///
    /// Also checks environment variables for API keys:
    /// - `HIRELINE_API_KEY` (highest priority)
    /// - `ANTHROPIC_API_KEY`
    /// - `OPENAI_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("HIRELINE_API_KEY")
                .ok()
                .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(provider) = std::env::var("HIRELINE_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("HIRELINE_MODEL") {
            config.model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".hireline")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.provider != "anthropic" && self.provider != "openai" {
            return Err(ConfigError::ValidationError(format!(
                "unknown provider '{}': expected 'anthropic' or 'openai'",
                self.provider
            )));
        }

        if self.max_tool_rounds == 0 {
            return Err(ConfigError::ValidationError(
                "max_tool_rounds must be at least 1".into(),
            ));
        }

        if let (Some(_), Some(_)) = (
            &self.intake.system_prompt_override,
            &self.intake.system_prompt_file,
        ) {
            return Err(ConfigError::ValidationError(
                "set either system_prompt_override or system_prompt_file, not both".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for `config init`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            model: default_model(),
            api_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_tool_rounds: default_max_tool_rounds(),
            intake: IntakeConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
