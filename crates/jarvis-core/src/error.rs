//! Error Types

use thiserror::Error;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, ChatError>;

/// Result type alias for generation service calls
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Failure reported by a generation service.
///
/// `Display` yields the bare message so it can be shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Model or endpoint does not exist (HTTP 404)
    #[error("{0}")]
    NotFound(String),

    /// Any other non-success HTTP status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Connection, DNS or timeout failure
    #[error("{0}")]
    Transport(String),

    /// The service answered but produced no usable text
    #[error("{0}")]
    EmptyResponse(String),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl ServiceError {
    /// Build an error from a bare message with no structured kind.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// HTTP status code, when the failure came from an HTTP response
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Session controller errors
#[derive(Error, Debug)]
pub enum ChatError {
    /// A reply is still outstanding; the submit was rejected
    #[error("Session busy: a reply is already pending")]
    Busy,

    /// `complete` was called with no reply outstanding
    #[error("No reply is pending")]
    NotAwaiting,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generation service error surfaced outside the transcript
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_displays_bare_message() {
        let err = ServiceError::Status {
            status: 500,
            message: "upstream exploded".into(),
        };
        assert_eq!(err.to_string(), "upstream exploded");
        assert_eq!(err.status(), Some(500));
        assert_eq!(ServiceError::NotFound("gone".into()).status(), Some(404));
        assert_eq!(ServiceError::other("network timeout").status(), None);
    }

    #[test]
    fn test_chat_error_wraps_service_error() {
        let err: ChatError = ServiceError::Transport("refused".into()).into();
        assert_eq!(err.to_string(), "Service error: refused");
    }
}
