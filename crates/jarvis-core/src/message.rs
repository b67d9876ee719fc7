//! Conversation Turns
//!
//! The transcript model shared by every front-end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opening assistant turn of every session
pub const GREETING: &str =
    "Hello! I'm JARVIS, your advanced AI assistant. How can I help you today?";

/// Role of a turn's speaker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User input
    User,
    /// Assistant (model or fallback) response
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a conversation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Speaker
    pub role: Role,

    /// Text content, whitespace preserved
    pub content: String,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Append-only, never-empty conversation history.
///
/// The first turn is always the assistant greeting.
#[derive(Clone, Debug, Serialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::assistant(GREETING)],
        }
    }

    /// Append a turn
    pub(crate) fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns in chronological order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recent turn
    pub fn last(&self) -> &Turn {
        // Constructed with the greeting and never shrinks.
        &self.turns[self.turns.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Render as `role: content` lines.
    ///
    /// Useful for display and debugging; the session never sends it to the
    /// generation service.
    pub fn render_history(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.role, t.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_starts_with_greeting() {
        let transcript = Transcript::new();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last().role, Role::Assistant);
        assert_eq!(transcript.last().content, GREETING);
    }

    #[test]
    fn test_render_history() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::user("line one\nline two"));
        transcript.push(Turn::assistant("ok"));

        let expected = format!("assistant: {GREETING}\nuser: line one\nline two\nassistant: ok");
        assert_eq!(transcript.render_history(), expected);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Turn::user("hi")).unwrap();
        assert!(json.contains(r#""role":"user""#));
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
