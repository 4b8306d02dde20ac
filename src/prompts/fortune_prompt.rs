//! Daily fortune prompt
//!
//! The fortune prompt asks the model for today's fortune of one zodiac sign,
//! split into three numbered sections and written in a friendly, positive tone.

use crate::zodiac::ZodiacSign;

/// Section headings the reply is asked to contain, in order
pub const FORTUNE_SECTIONS: [&str; 3] = [
    "성격 및 심리적 경향",
    "대인관계 및 인간관계 운",
    "직업 및 일 관련 운",
];

/// Generates the fortune prompt for a sign
///
/// # Arguments
///
/// * `sign` - The resolved zodiac sign
///
/// # Returns
///
/// The prompt text sent to the provider as a single user message
///
/// # Examples
///
/// ```
/// use zodiac_fortune::prompts::fortune_prompt::generate_fortune_prompt;
/// use zodiac_fortune::zodiac::ZodiacSign;
///
/// let prompt = generate_fortune_prompt(ZodiacSign::Leo);
/// assert!(prompt.contains("사용자의 별자리: 사자자리"));
/// ```
pub fn generate_fortune_prompt(sign: ZodiacSign) -> String {
    let sections = FORTUNE_SECTIONS
        .iter()
        .enumerate()
        .map(|(idx, title)| format!("{}. {}", idx + 1, title))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "사용자의 별자리: {}\n\
         오늘의 운세를 아래 3가지 항목으로 자세히 알려줘.\n\
         {}\n\
         각 항목별로 친근하고 긍정적으로 설명해줘.",
        sign.label(),
        sections
    )
}
