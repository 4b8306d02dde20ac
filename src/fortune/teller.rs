//! Fortune request orchestration
//!
//! A request goes through four steps: validate the selection, resolve the
//! zodiac sign, ask the provider for the fortune, and record the exchange in
//! the session transcript. The transcript is only touched after the provider
//! has answered, so a failed request leaves it exactly as it was.

use crate::error::{FortuneError, Result};
use crate::fortune::transcript::{SelectionMode, Transcript};
use crate::prompts;
use crate::providers::Provider;
use crate::zodiac::{self, ZodiacSign};

/// What the user asked for, as typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A sign picked directly (Korean label or English name)
    Sign(String),
    /// A birth date in `YYYY-MM-DD` form
    BirthDate(String),
}

impl Selection {
    /// Builds a selection for the given mode from raw input
    ///
    /// # Examples
    ///
    /// ```
    /// use zodiac_fortune::fortune::{Selection, SelectionMode};
    ///
    /// let selection = Selection::new(SelectionMode::ByBirthDate, "1990-05-21");
    /// assert_eq!(selection, Selection::BirthDate("1990-05-21".to_string()));
    /// ```
    pub fn new(mode: SelectionMode, value: impl Into<String>) -> Self {
        match mode {
            SelectionMode::BySign => Self::Sign(value.into()),
            SelectionMode::ByBirthDate => Self::BirthDate(value.into()),
        }
    }

    /// Mode this selection was made in
    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::Sign(_) => SelectionMode::BySign,
            Self::BirthDate(_) => SelectionMode::ByBirthDate,
        }
    }

    /// The raw value the user entered
    pub fn value(&self) -> &str {
        match self {
            Self::Sign(value) | Self::BirthDate(value) => value,
        }
    }

    /// Validates the selection and resolves its zodiac sign
    ///
    /// No provider call is made.
    ///
    /// # Errors
    ///
    /// Returns `FortuneError::Validation` if the sign is empty or unknown, or
    /// if the birth date is not a valid `YYYY-MM-DD` date.
    ///
    /// # Examples
    ///
    /// ```
    /// use zodiac_fortune::fortune::Selection;
    /// use zodiac_fortune::zodiac::ZodiacSign;
    ///
    /// let resolved = Selection::BirthDate("1990-08-01".into()).resolve().unwrap();
    /// assert_eq!(resolved.sign, ZodiacSign::Leo);
    /// assert_eq!(resolved.query, "1990-08-01 (계산된 별자리: 사자자리)");
    /// ```
    pub fn resolve(&self) -> Result<Resolved> {
        match self {
            Self::Sign(value) => {
                let sign: ZodiacSign = value.parse()?;
                Ok(Resolved {
                    sign,
                    mode: SelectionMode::BySign,
                    query: sign.label().to_string(),
                })
            }
            Self::BirthDate(value) => {
                let date = zodiac::parse_birth_date(value)?;
                let sign = ZodiacSign::from_date(date).ok_or_else(|| {
                    FortuneError::Validation(format!("No zodiac sign covers {}", date))
                })?;
                Ok(Resolved {
                    sign,
                    mode: SelectionMode::ByBirthDate,
                    query: format!("{} (계산된 별자리: {})", value.trim(), sign),
                })
            }
        }
    }
}

/// A validated selection, ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Sign the fortune is about
    pub sign: ZodiacSign,
    /// Mode the selection was made in
    pub mode: SelectionMode,
    /// Text recorded as the user's turn
    pub query: String,
}

/// Turns selections into fortunes using a text generation provider
///
/// # Examples
///
/// ```no_run
/// use zodiac_fortune::config::GeminiConfig;
/// use zodiac_fortune::fortune::{FortuneTeller, Selection, Transcript};
/// use zodiac_fortune::providers::GeminiProvider;
///
/// # async fn example() -> zodiac_fortune::error::Result<()> {
/// let provider = GeminiProvider::new(GeminiConfig::default(), "api-key")?;
/// let teller = FortuneTeller::new(provider);
/// let mut transcript = Transcript::new();
/// teller
///     .request(&mut transcript, &Selection::Sign("사자자리".to_string()))
///     .await?;
/// assert_eq!(transcript.len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct FortuneTeller<P: Provider> {
    provider: P,
}

impl<P: Provider> FortuneTeller<P> {
    /// Creates a fortune teller around a provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Requests today's fortune and records the exchange
    ///
    /// On success the transcript gains exactly two turns, the user's query
    /// followed by the provider's reply, and the reply is returned.
    ///
    /// # Errors
    ///
    /// Returns `FortuneError::Validation` for bad input (no provider call is
    /// made) and `FortuneError::Service` if the provider fails or answers
    /// with nothing. In both cases the transcript is unchanged.
    pub async fn request(
        &self,
        transcript: &mut Transcript,
        selection: &Selection,
    ) -> Result<String> {
        let resolved = selection.resolve().map_err(|e| {
            tracing::debug!("Rejected selection {:?}: {}", selection, e);
            e
        })?;

        tracing::info!(
            sign = resolved.sign.english_name(),
            mode = ?resolved.mode,
            "Requesting fortune"
        );

        let messages = prompts::build_fortune_messages(resolved.sign);
        let response = self
            .provider
            .complete(&messages)
            .await
            .map_err(into_service_error)?;

        if let Some(usage) = response.usage {
            tracing::debug!(
                "Fortune used {} prompt + {} completion tokens",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        let reply = response.message.content;
        if reply.trim().is_empty() {
            tracing::warn!("Provider returned an empty fortune for {}", resolved.sign);
            return Err(
                FortuneError::Service("Provider returned an empty response".to_string()).into(),
            );
        }

        transcript.append_exchange(resolved.mode, resolved.query, reply.clone());
        Ok(reply)
    }
}

/// Normalizes any provider failure to `FortuneError::Service`
fn into_service_error(err: anyhow::Error) -> anyhow::Error {
    tracing::warn!("Fortune request failed: {}", err);
    match err.downcast::<FortuneError>() {
        Ok(FortuneError::Service(message)) => FortuneError::Service(message).into(),
        Ok(other) => FortuneError::Service(other.to_string()).into(),
        Err(other) => FortuneError::Service(format!("{:#}", other)).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fortune::Role;
    use crate::providers::{CompletionResponse, Message};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Provider that answers with fixed text and records what it was sent
    struct StubProvider {
        reply: String,
        calls: Arc<Mutex<Vec<Vec<Message>>>>,
    }

    impl StubProvider {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Provider for StubProvider {
        async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
            self.calls.lock().unwrap().push(messages.to_vec());
            Ok(CompletionResponse::new(Message::assistant(self.reply.clone())))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl Provider for FailingProvider {
        async fn complete(&self, _messages: &[Message]) -> Result<CompletionResponse> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_sign_selection_appends_user_and_assistant_turns() {
        let teller = FortuneTeller::new(StubProvider::new("T"));
        let mut transcript = Transcript::new();

        let reply = teller
            .request(&mut transcript, &Selection::Sign("사자자리".to_string()))
            .await
            .unwrap();

        assert_eq!(reply, "T");
        assert_eq!(transcript.len(), 2);
        let turns = transcript.turns();
        assert_eq!(turns[0].role(), Role::User);
        assert_eq!(turns[0].content(), "사자자리");
        assert_eq!(turns[0].mode(), SelectionMode::BySign);
        assert_eq!(turns[1].role(), Role::Assistant);
        assert_eq!(turns[1].content(), "T");
    }

    #[tokio::test]
    async fn test_prompt_sent_for_resolved_sign() {
        let teller = FortuneTeller::new(StubProvider::new("T"));
        let mut transcript = Transcript::new();
        teller
            .request(&mut transcript, &Selection::BirthDate("1990-08-01".to_string()))
            .await
            .unwrap();

        let calls = teller.provider().calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], prompts::build_fortune_messages(ZodiacSign::Leo));
    }

    #[tokio::test]
    async fn test_birth_date_selection_records_composite_query() {
        let teller = FortuneTeller::new(StubProvider::new("T"));
        let mut transcript = Transcript::new();
        teller
            .request(&mut transcript, &Selection::BirthDate("1990-05-21".to_string()))
            .await
            .unwrap();

        let expected = zodiac::classify(5, 21).unwrap();
        let query = transcript.turns()[0].content();
        assert!(query.contains("1990-05-21"));
        assert!(query.contains(expected.label()));
        assert_eq!(transcript.turns()[0].mode(), SelectionMode::ByBirthDate);
    }

    #[tokio::test]
    async fn test_invalid_date_is_validation_error_without_call() {
        let teller = FortuneTeller::new(StubProvider::new("T"));
        let mut transcript = Transcript::new();

        let err = teller
            .request(&mut transcript, &Selection::BirthDate("not-a-date".to_string()))
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<FortuneError>().unwrap().is_validation());
        assert!(transcript.is_empty());
        assert_eq!(teller.provider().call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_sign_is_validation_error() {
        let teller = FortuneTeller::new(StubProvider::new("T"));
        let mut transcript = Transcript::new();

        let err = teller
            .request(&mut transcript, &Selection::Sign("   ".to_string()))
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<FortuneError>().unwrap().is_validation());
        assert_eq!(teller.provider().call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_service_error_and_transcript_unchanged() {
        let teller = FortuneTeller::new(FailingProvider);
        let mut transcript = Transcript::new();

        let err = teller
            .request(&mut transcript, &Selection::Sign("Leo".to_string()))
            .await
            .unwrap_err();

        let err = err.downcast_ref::<FortuneError>().unwrap();
        assert!(err.is_service());
        assert!(err.to_string().contains("connection refused"));
        assert!(transcript.is_empty());
    }

    #[tokio::test]
    async fn test_service_error_is_not_double_wrapped() {
        struct QuotaProvider;

        #[async_trait]
        impl Provider for QuotaProvider {
            async fn complete(&self, _messages: &[Message]) -> Result<CompletionResponse> {
                Err(FortuneError::Service("quota exceeded".to_string()).into())
            }
        }

        let teller = FortuneTeller::new(QuotaProvider);
        let err = teller
            .request(&mut Transcript::new(), &Selection::Sign("Leo".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Service error: quota exceeded");
    }

    #[tokio::test]
    async fn test_empty_reply_is_service_error() {
        let teller = FortuneTeller::new(StubProvider::new("  \n"));
        let mut transcript = Transcript::new();

        let err = teller
            .request(&mut transcript, &Selection::Sign("Leo".to_string()))
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<FortuneError>().unwrap().is_service());
        assert!(transcript.is_empty());
    }

    #[tokio::test]
    async fn test_failure_after_success_keeps_earlier_turns() {
        let teller = FortuneTeller::new(StubProvider::new("T"));
        let mut transcript = Transcript::new();
        teller
            .request(&mut transcript, &Selection::Sign("Aries".to_string()))
            .await
            .unwrap();
        let _ = teller
            .request(&mut transcript, &Selection::BirthDate("1990-02-30".to_string()))
            .await;

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.turns()[0].content(), "양자리");
    }

    #[test]
    fn test_resolve_sign_records_canonical_label() {
        let resolved = Selection::Sign("leo".to_string()).resolve().unwrap();
        assert_eq!(resolved.sign, ZodiacSign::Leo);
        assert_eq!(resolved.mode, SelectionMode::BySign);
        assert_eq!(resolved.query, "사자자리");
    }

    #[test]
    fn test_selection_accessors() {
        let selection = Selection::new(SelectionMode::BySign, "Leo");
        assert_eq!(selection.mode(), SelectionMode::BySign);
        assert_eq!(selection.value(), "Leo");
    }
}
