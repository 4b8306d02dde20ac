//! Session transcript
//!
//! The transcript is the ordered, append-only record of one interactive
//! session. It is created empty when the session starts, owned by the
//! front-end, and dropped with it. Turns are only ever added in
//! user/assistant pairs by the fortune teller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the user picked the sign for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    /// The user chose a sign from the list
    #[default]
    #[serde(rename = "sign")]
    BySign,
    /// The user entered a birth date and the sign was computed
    #[serde(rename = "birthdate")]
    ByBirthDate,
}

impl SelectionMode {
    /// Parse a selection mode from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use zodiac_fortune::fortune::SelectionMode;
    ///
    /// assert_eq!(SelectionMode::parse_str("birth").unwrap(), SelectionMode::ByBirthDate);
    /// assert_eq!(SelectionMode::parse_str("sign").unwrap(), SelectionMode::BySign);
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "sign" | "zodiac" | "by-sign" => Ok(Self::BySign),
            "birth" | "birthdate" | "date" | "by-birthdate" => Ok(Self::ByBirthDate),
            other => Err(format!("Unknown selection mode: {}", other)),
        }
    }

    /// Label shown in the transcript
    pub fn label(&self) -> &'static str {
        match self {
            Self::BySign => "별자리로 보기",
            Self::ByBirthDate => "생년월일로 보기",
        }
    }

    /// What the user is expected to type in this mode
    pub fn input_hint(&self) -> &'static str {
        match self {
            Self::BySign => "별자리를 입력하세요 (예: 사자자리, Leo)",
            Self::ByBirthDate => "생년월일을 입력하세요 (YYYY-MM-DD)",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message of the transcript
///
/// Turns cannot be changed after they are created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    role: Role,
    mode: SelectionMode,
    content: String,
}

impl Turn {
    fn new(role: Role, mode: SelectionMode, content: String) -> Self {
        Self {
            role,
            mode,
            content,
        }
    }

    /// Who wrote the turn
    pub fn role(&self) -> Role {
        self.role
    }

    /// Selection mode in effect when the turn was recorded
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Text of the turn
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}) : {}", self.role, self.mode.label(), self.content)
    }
}

/// Append-only, session-scoped log of turns
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates an empty transcript for a new session
    ///
    /// # Examples
    ///
    /// ```
    /// use zodiac_fortune::fortune::Transcript;
    ///
    /// let transcript = Transcript::new();
    /// assert!(transcript.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of turns recorded so far
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// All turns in order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Records a completed exchange: the user turn, then the assistant turn
    pub(crate) fn append_exchange(
        &mut self,
        mode: SelectionMode,
        query: impl Into<String>,
        reply: impl Into<String>,
    ) {
        self.turns.reserve(2);
        self.turns.push(Turn::new(Role::User, mode, query.into()));
        self.turns.push(Turn::new(Role::Assistant, mode, reply.into()));
    }

    /// Display lines, one per turn, in order
    ///
    /// The iterator is lazy and can be cloned to walk the transcript again.
    /// Each line reads `[role] (mode) : content`.
    pub fn lines(&self) -> impl Iterator<Item = String> + Clone + '_ {
        self.turns.iter().map(|turn| turn.to_string())
    }
}
