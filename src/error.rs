//! Error types for zodiac-fortune
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for zodiac-fortune operations
///
/// Session-level failures are either `Validation` (bad user input) or
/// `Service` (the text generation call failed). The remaining variants
/// belong to configuration, credential, and I/O plumbing. HTTP failures
/// never surface on their own; providers report them as `Service`.
#[derive(Error, Debug)]
pub enum FortuneError {
    /// User input could not be turned into a zodiac sign
    #[error("Validation error: {0}")]
    Validation(String),

    /// The text generation service call failed
    #[error("Service error: {0}")]
    Service(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl FortuneError {
    /// Returns true for errors the user can fix by changing their input
    ///
    /// # Examples
    ///
    /// ```
    /// use zodiac_fortune::error::FortuneError;
    ///
    /// assert!(FortuneError::Validation("bad date".to_string()).is_validation());
    /// assert!(!FortuneError::Service("timeout".to_string()).is_validation());
    /// ```
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true for failures of the text generation service
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service(_))
    }
}

/// Result type alias for zodiac-fortune operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let error = FortuneError::Validation("not-a-date".to_string());
        assert_eq!(error.to_string(), "Validation error: not-a-date");
    }

    #[test]
    fn test_service_error_display() {
        let error = FortuneError::Service("quota exceeded".to_string());
        assert_eq!(error.to_string(), "Service error: quota exceeded");
    }

    #[test]
    fn test_config_error_display() {
        let error = FortuneError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_missing_credentials_error_display() {
        let error = FortuneError::MissingCredentials("gemini".to_string());
        assert_eq!(error.to_string(), "Missing credentials for provider: gemini");
    }

    #[test]
    fn test_kind_predicates() {
        assert!(FortuneError::Validation(String::new()).is_validation());
        assert!(FortuneError::Service(String::new()).is_service());
        assert!(!FortuneError::Config(String::new()).is_service());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: FortuneError = io_error.into();
        assert!(matches!(error, FortuneError::Io(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: FortuneError = yaml_error.into();
        assert!(matches!(error, FortuneError::Yaml(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: FortuneError = json_error.into();
        assert!(matches!(error, FortuneError::Serialization(_)));
    }

    #[test]
    fn test_keyring_error_conversion() {
        let error: FortuneError = keyring::Error::NoEntry.into();
        assert!(matches!(error, FortuneError::Keyring(_)));
        assert!(error.to_string().starts_with("Keyring error:"));
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let result: Result<()> = Err(FortuneError::Validation("x".to_string()).into());
        let err = result.unwrap_err();
        assert!(err
            .downcast_ref::<FortuneError>()
            .is_some_and(FortuneError::is_validation));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FortuneError>();
    }
}
