//! Prompts sent to the text generation provider
//!
//! Only one template exists today: the daily fortune for a zodiac sign.

pub mod fortune_prompt;

use crate::providers::Message;
use crate::zodiac::ZodiacSign;

/// Builds the fortune prompt text for a sign
///
/// Deterministic: the same sign always yields the same prompt.
///
/// # Examples
///
/// ```
/// use zodiac_fortune::prompts::build_fortune_prompt;
/// use zodiac_fortune::zodiac::ZodiacSign;
///
/// let prompt = build_fortune_prompt(ZodiacSign::Aries);
/// assert!(prompt.contains("양자리"));
/// ```
pub fn build_fortune_prompt(sign: ZodiacSign) -> String {
    fortune_prompt::generate_fortune_prompt(sign)
}

/// Wraps the fortune prompt as the message list a provider expects
pub fn build_fortune_messages(sign: ZodiacSign) -> Vec<Message> {
    vec![Message::user(build_fortune_prompt(sign))]
}
