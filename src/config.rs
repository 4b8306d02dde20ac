//! Configuration management for zodiac-fortune
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{FortuneError, Result};
use crate::fortune::SelectionMode;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Providers the application knows how to construct
pub const VALID_PROVIDERS: [&str; 2] = ["gemini", "ollama"];

/// Main configuration structure for zodiac-fortune
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Gemini, Ollama)
    pub provider: ProviderConfig,
    /// Interactive chat settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Provider configuration
///
/// Specifies which text generation provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: "gemini".to_string(),
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

/// Google Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model identifier passed to `generateContent`
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL (overridable for tests and proxies)
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// Inline API key
    ///
    /// Prefer the `GOOGLE_API_KEY` environment variable or the keyring; this
    /// field is mostly useful for tests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: default_gemini_api_base(),
            api_key: None,
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Interactive chat configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Selection mode the chat session starts in
    #[serde(default)]
    pub default_mode: SelectionMode,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            provider: ProviderConfig::default(),
            chat: ChatConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FortuneError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(FortuneError::from)
            .with_context(|| format!("Failed to parse config file {}", path))
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("ZODIAC_FORTUNE_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(model) = std::env::var("ZODIAC_FORTUNE_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Ok(api_base) = std::env::var("ZODIAC_FORTUNE_GEMINI_API_BASE") {
            self.provider.gemini.api_base = api_base;
        }

        if let Ok(host) = std::env::var("ZODIAC_FORTUNE_OLLAMA_HOST") {
            self.provider.ollama.host = host;
        }

        if let Ok(model) = std::env::var("ZODIAC_FORTUNE_OLLAMA_MODEL") {
            self.provider.ollama.model = model;
        }

        if let Ok(mode) = std::env::var("ZODIAC_FORTUNE_DEFAULT_MODE") {
            match SelectionMode::parse_str(&mode) {
                Ok(parsed) => self.chat.default_mode = parsed,
                Err(e) => tracing::warn!("Invalid ZODIAC_FORTUNE_DEFAULT_MODE: {}", e),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        let (provider, model) = cli.command.provider_overrides();
        if let Some(provider) = provider {
            tracing::debug!("Using provider override: {}", provider);
            self.provider.provider_type = provider.to_string();
        }
        if let Some(model) = model {
            tracing::debug!("Using model override: {}", model);
            self.set_active_model(model);
        }
    }

    /// Set the model of the currently selected provider
    pub fn set_active_model(&mut self, model: &str) {
        match self.provider.provider_type.as_str() {
            "ollama" => self.provider.ollama.model = model.to_string(),
            _ => self.provider.gemini.model = model.to_string(),
        }
    }

    /// Model identifier of the currently selected provider
    pub fn active_model(&self) -> &str {
        match self.provider.provider_type.as_str() {
            "ollama" => &self.provider.ollama.model,
            _ => &self.provider.gemini.model,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(FortuneError::Config("Provider type cannot be empty".to_string()).into());
        }

        if !VALID_PROVIDERS.contains(&self.provider.provider_type.as_str()) {
            return Err(FortuneError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                VALID_PROVIDERS.join(", ")
            ))
            .into());
        }

        if self.provider.gemini.model.trim().is_empty() {
            return Err(
                FortuneError::Config("gemini.model cannot be empty".to_string()).into(),
            );
        }

        if !self.provider.gemini.api_base.starts_with("http://")
            && !self.provider.gemini.api_base.starts_with("https://")
        {
            return Err(FortuneError::Config(format!(
                "gemini.api_base must be an http(s) URL, got '{}'",
                self.provider.gemini.api_base
            ))
            .into());
        }

        if self.provider.ollama.model.trim().is_empty() {
            return Err(
                FortuneError::Config("ollama.model cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
