//! Provider module for zodiac-fortune
//!
//! This module contains the text generation provider abstraction and the
//! implementations for Google Gemini and Ollama.

pub mod base;
pub mod gemini;
pub mod ollama;

pub use base::{CompletionResponse, Message, Provider, TokenUsage};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

use crate::config::ProviderConfig;
use crate::error::{FortuneError, Result};

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `provider_type` - Type of provider ("gemini" or "ollama")
/// * `config` - Provider configuration
///
/// # Errors
///
/// Returns error if provider type is invalid, no API key is available for
/// Gemini, or initialization fails
pub fn create_provider(provider_type: &str, config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    create_provider_with_override(config, Some(provider_type), None)
}

/// Create a provider instance with optional provider and model overrides
///
/// # Arguments
///
/// * `config` - Full provider configuration containing all provider settings
/// * `provider_override` - Optional provider type override ("gemini" or "ollama")
/// * `model_override` - Optional model name override
///
/// # Errors
///
/// Returns error if the provider type is invalid or initialization fails
///
/// # Examples
///
/// ```no_run
/// use zodiac_fortune::config::ProviderConfig;
/// use zodiac_fortune::providers::create_provider_with_override;
///
/// # fn example() -> zodiac_fortune::error::Result<()> {
/// let config = ProviderConfig::default();
///
/// // Use the configured provider
/// let default_provider = create_provider_with_override(&config, None, None)?;
///
/// // Use a local Ollama model instead
/// let local = create_provider_with_override(&config, Some("ollama"), Some("gemma2:2b"))?;
/// # Ok(())
/// # }
/// ```
pub fn create_provider_with_override(
    config: &ProviderConfig,
    provider_override: Option<&str>,
    model_override: Option<&str>,
) -> Result<Box<dyn Provider>> {
    let provider_type = provider_override.unwrap_or(&config.provider_type);

    match provider_type {
        "gemini" => {
            let mut gemini_config = config.gemini.clone();
            if let Some(model) = model_override {
                gemini_config.model = model.to_string();
            }

            Ok(Box::new(GeminiProvider::from_config(gemini_config)?))
        }
        "ollama" => {
            let mut ollama_config = config.ollama.clone();
            if let Some(model) = model_override {
                ollama_config.model = model.to_string();
            }

            Ok(Box::new(OllamaProvider::new(ollama_config)?))
        }
        _ => Err(FortuneError::Config(format!(
            "Unknown provider type: {}",
            provider_type
        ))
        .into()),
    }
}
