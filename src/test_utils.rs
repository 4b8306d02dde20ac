//! Test utilities for zodiac-fortune
//!
//! This module provides common test utilities including temporary directory
//! management, config fixtures, and assertion helpers.

use crate::config::Config;
use crate::error::Result;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Create a test configuration YAML string
///
/// Uses Ollama with an inline Gemini key so no keyring or network access
/// is needed to build either provider.
pub fn test_config_yaml() -> String {
    r#"
provider:
  type: ollama
  gemini:
    model: gemini-1.5-flash
    api_key: test-key
  ollama:
    host: http://localhost:11434
    model: gemma2:2b
chat:
  default_mode: birthdate
"#
    .to_string()
}

/// Parse the fixture from `test_config_yaml`
pub fn test_config() -> Config {
    serde_yaml::from_str(&test_config_yaml()).expect("Test config YAML must parse")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FortuneError;
    use crate::fortune::SelectionMode;

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: Result<()> = Err(FortuneError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn test_assert_error_contains_wrong_message() {
        let result: Result<()> = Err(FortuneError::Config("different error".to_string()).into());
        assert_error_contains(result, "not present");
    }

    #[test]
    fn test_test_config() {
        let config = test_config();
        assert_eq!(config.provider.provider_type, "ollama");
        assert_eq!(config.chat.default_mode, SelectionMode::ByBirthDate);
        assert!(config.validate().is_ok());
    }
}
