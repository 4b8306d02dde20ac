//! Google Gemini provider implementation for zodiac-fortune
//!
//! This module implements the Provider trait against the Gemini REST API
//! (`models/{model}:generateContent`). The API key travels in the
//! `x-goog-api-key` header so it never ends up in logged URLs.

use crate::config::GeminiConfig;
use crate::error::{FortuneError, Result};
use crate::providers::{CompletionResponse, Message, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API provider
///
/// # Examples
///
/// ```no_run
/// use zodiac_fortune::config::GeminiConfig;
/// use zodiac_fortune::providers::{GeminiProvider, Provider, Message};
///
/// # async fn example() -> zodiac_fortune::error::Result<()> {
/// let provider = GeminiProvider::new(GeminiConfig::default(), "my-api-key")?;
/// let completion = provider.complete(&[Message::user("Hello!")]).await?;
/// println!("{}", completion.text());
/// # Ok(())
/// # }
/// ```
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

/// Request body for `generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

/// One conversation entry in Gemini format
#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

/// Text part of a content entry
#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// Response body of `generateContent`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Error envelope returned on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Gemini configuration (model and API base)
    /// * `api_key` - Resolved API key
    ///
    /// # Errors
    ///
    /// Returns error if the key is blank or HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use zodiac_fortune::config::GeminiConfig;
    /// use zodiac_fortune::providers::GeminiProvider;
    ///
    /// let provider = GeminiProvider::new(GeminiConfig::default(), "key").unwrap();
    /// assert_eq!(provider.model(), "gemini-1.5-flash");
    /// ```
    pub fn new(config: GeminiConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FortuneError::MissingCredentials("gemini".to_string()).into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent(concat!("zodiac-fortune/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FortuneError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Gemini provider: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Create a provider, looking the API key up from config, env, or keyring
    ///
    /// # Errors
    ///
    /// Returns `FortuneError::MissingCredentials` if no key is available
    pub fn from_config(config: GeminiConfig) -> Result<Self> {
        let api_key = crate::credentials::resolve_gemini_api_key(&config)?;
        Self::new(config, api_key)
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Convert messages to Gemini contents
    ///
    /// System messages become the system instruction; assistant messages use
    /// Gemini's `model` role.
    fn convert_messages(&self, messages: &[Message]) -> GenerateContentRequest {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            let part = Part {
                text: Some(message.content.clone()),
            };
            match message.role.as_str() {
                "system" => system_parts.push(part),
                "assistant" => contents.push(Content {
                    role: "model".to_string(),
                    parts: vec![part],
                }),
                _ => contents.push(Content {
                    role: "user".to_string(),
                    parts: vec![part],
                }),
            }
        }

        let system_instruction = (!system_parts.is_empty()).then(|| Content {
            role: "system".to_string(),
            parts: system_parts,
        });

        GenerateContentRequest {
            contents,
            system_instruction,
        }
    }
}

/// Pull the reply text out of the first candidate
fn extract_text(response: &GenerateContentResponse) -> Result<String> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        return Err(
            FortuneError::Service(format!("Gemini blocked the prompt: {}", reason)).into(),
        );
    }

    let candidate = response.candidates.first().ok_or_else(|| {
        FortuneError::Service("Gemini returned no candidates".to_string())
    })?;

    let text: String = candidate
        .content
        .as_ref()
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(FortuneError::Service(format!(
            "Gemini returned no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ))
        .into());
    }

    Ok(text)
}

/// Build a readable message from an error body
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .map(|wrapper| {
            let message = wrapper.error.message.unwrap_or_else(|| body.to_string());
            match wrapper.error.status {
                Some(status_text) if !status_text.is_empty() => {
                    format!("{}: {}", status_text, message)
                }
                _ => message,
            }
        })
        .unwrap_or_else(|| body.to_string());

    format!("Gemini returned error {}: {}", status, detail)
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
        let request = self.convert_messages(messages);

        tracing::debug!(
            "Sending Gemini request: model={}, {} contents",
            self.config.model,
            request.contents.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                FortuneError::Service(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            tracing::error!("{}", message);
            return Err(FortuneError::Service(message).into());
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            FortuneError::Service(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = extract_text(&parsed)?;
        let message = Message::assistant(text);

        Ok(match parsed.usage_metadata {
            Some(usage) => CompletionResponse::with_usage(
                message,
                TokenUsage::new(usage.prompt_token_count, usage.candidates_token_count),
            ),
            None => CompletionResponse::new(message),
        })
    }

    fn get_current_model(&self) -> Result<String> {
        Ok(self.config.model.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GeminiProvider {
        GeminiProvider::new(GeminiConfig::default(), "test-key").unwrap()
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let result = GeminiProvider::new(GeminiConfig::default(), "  ");
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_uses_model_and_trims_slash() {
        let config = GeminiConfig {
            api_base: "http://localhost:9999/v1beta/".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
        };
        let provider = GeminiProvider::new(config, "k").unwrap();
        assert_eq!(
            provider.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_convert_messages_roles() {
        let request = provider().convert_messages(&[
            Message::system("be nice"),
            Message::user("hi"),
            Message::assistant("hello"),
        ]);
        assert_eq!(request.contents.len(), 2);
        assert_eq!(request.contents[0].role, "user");
        assert_eq!(request.contents[1].role, "model");
        assert!(request.system_instruction.is_some());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be nice");
    }

    #[test]
    fn test_convert_messages_without_system() {
        let request = provider().convert_messages(&[Message::user("hi")]);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"a"},{"text":"b"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(&response).unwrap(), "ab");
    }

    #[test]
    fn test_extract_text_no_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        let err = extract_text(&response).unwrap_err();
        assert!(err.to_string().contains("no candidates"));
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        let err = extract_text(&response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_extract_text_empty_candidate() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#).unwrap();
        let err = extract_text(&response).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_error_message_parses_envelope() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        let message = error_message(reqwest::StatusCode::BAD_REQUEST, body);
        assert!(message.contains("INVALID_ARGUMENT: API key not valid"));
        assert!(message.contains("400"));
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        let message = error_message(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert!(message.ends_with("upstream down"));
    }

    #[test]
    fn test_get_current_model() {
        assert_eq!(provider().get_current_model().unwrap(), "gemini-1.5-flash");
    }
}
