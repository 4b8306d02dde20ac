//! API key lookup and storage
//!
//! The Gemini API key is looked up once when the provider is built, in this
//! order: the `api_key` field of the config file, the `GOOGLE_API_KEY`
//! environment variable, then the system keyring.

use crate::config::GeminiConfig;
use crate::error::{FortuneError, Result};

/// Keyring service name used for stored keys
pub const KEYRING_SERVICE: &str = "zodiac-fortune";

/// Keyring user under which the Gemini API key is stored
pub const GEMINI_KEYRING_USER: &str = "gemini_api_key";

/// Environment variable holding the Gemini API key
pub const GEMINI_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Where a resolved key came from, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Config,
    Environment,
    Keyring,
}

/// Resolve the Gemini API key
///
/// # Errors
///
/// Returns `FortuneError::MissingCredentials` when no source has a key.
pub fn resolve_gemini_api_key(config: &GeminiConfig) -> Result<String> {
    let env_key = std::env::var(GEMINI_API_KEY_ENV).ok();
    if let Some((key, source)) = pick_api_key(config.api_key.as_deref(), env_key.as_deref()) {
        tracing::debug!("Using Gemini API key from {:?}", source);
        return Ok(key);
    }

    match read_keyring(GEMINI_KEYRING_USER) {
        Ok(Some(key)) => {
            tracing::debug!("Using Gemini API key from {:?}", KeySource::Keyring);
            Ok(key)
        }
        Ok(None) => Err(missing_gemini_key()),
        Err(e) => {
            tracing::warn!("Could not read keyring: {}", e);
            Err(missing_gemini_key())
        }
    }
}

/// Pick the first non-blank key from config, then environment
pub fn pick_api_key(
    config_key: Option<&str>,
    env_key: Option<&str>,
) -> Option<(String, KeySource)> {
    let non_blank = |key: &str| {
        let trimmed = key.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    config_key
        .and_then(non_blank)
        .map(|key| (key, KeySource::Config))
        .or_else(|| {
            env_key
                .and_then(non_blank)
                .map(|key| (key, KeySource::Environment))
        })
}

/// Store an API key for a provider in the system keyring
///
/// # Errors
///
/// Returns an error if the provider does not use an API key, the key is
/// blank, or the keyring rejects the write.
pub fn store_api_key(provider: &str, key: &str) -> Result<()> {
    let user = keyring_user_for(provider)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(FortuneError::Validation("API key cannot be empty".to_string()).into());
    }

    let entry = keyring::Entry::new(KEYRING_SERVICE, user).map_err(FortuneError::from)?;
    entry.set_password(key).map_err(FortuneError::from)?;
    tracing::info!("Stored API key for {} in the system keyring", provider);
    Ok(())
}

/// Keyring user name for a provider's API key
pub fn keyring_user_for(provider: &str) -> Result<&'static str> {
    match provider {
        "gemini" => Ok(GEMINI_KEYRING_USER),
        other => Err(FortuneError::Config(format!(
            "Provider '{}' does not use an API key",
            other
        ))
        .into()),
    }
}

fn read_keyring(user: &str) -> std::result::Result<Option<String>, keyring::Error> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, user)?;
    match entry.get_password() {
        Ok(key) if !key.trim().is_empty() => Ok(Some(key.trim().to_string())),
        Ok(_) | Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(e),
    }
}

fn missing_gemini_key() -> anyhow::Error {
    FortuneError::MissingCredentials(format!(
        "gemini (set {} or run `zodiac-fortune auth`)",
        GEMINI_API_KEY_ENV
    ))
    .into()
}
