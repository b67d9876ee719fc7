//! Canned replies and failure classification
//!
//! When the generation service looks misconfigured (model missing, endpoint
//! not found) the session answers with one of these messages instead of the
//! raw error.

use rand::Rng;

use crate::error::ServiceError;

/// Prefix for failures that are shown verbatim
pub const ERROR_PREFIX: &str = "Sorry, I encountered an error: ";

/// Replies substituted when the service is unavailable
pub const FALLBACK_REPLIES: [&str; 4] = [
    "I'm JARVIS, your AI assistant. It seems there's an issue with my connection to the AI service. Please make sure the Google Generative Language API is enabled in your Google Cloud project and that your API key has proper permissions.",
    "Hello! I'm JARVIS. Currently experiencing issues connecting to my AI backend. Please check that the Gemini API is properly configured in your Google Cloud project.",
    "I'm your JARVIS assistant. The API connection seems to have an issue. Ensure your Google Cloud project has the Generative Language API enabled.",
    "Greetings! I'm JARVIS. There's a configuration issue with my AI service. Please verify your API key permissions in the Google Cloud Console.",
];

/// Pick a fallback reply uniformly at random
pub fn pick_fallback<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    FALLBACK_REPLIES[rng.gen_range(0..FALLBACK_REPLIES.len())]
}

/// How a failed generation is presented in the transcript
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Service missing or misconfigured: answer with a fallback reply
    Unavailable,
    /// Anything else: show the error message
    Other,
}

impl FailureKind {
    /// Classify a service error.
    ///
    /// A structured `NotFound` always counts as unavailable; otherwise the
    /// message text decides.
    pub fn classify(error: &ServiceError) -> Self {
        match error {
            ServiceError::NotFound(_) => Self::Unavailable,
            other => Self::classify_message(&other.to_string()),
        }
    }

    /// Case-sensitive substring check for `404` or `not found`
    pub fn classify_message(message: &str) -> Self {
        if message.contains("404") || message.contains("not found") {
            Self::Unavailable
        } else {
            Self::Other
        }
    }
}

/// Transcript text for a non-fallback failure
pub fn error_reply(message: &str) -> String {
    format!("{ERROR_PREFIX}{message}")
}
