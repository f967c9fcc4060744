//! Error Types
//!
//! Taxonomy per the session design: validation failures are rejected
//! locally and never sent upstream; upstream failures are surfaced to the
//! user with a message that distinguishes rate limiting from quota
//! exhaustion from generic failure; malformed stream fragments are
//! recovered silently by the stream consumer and never become errors.

use thiserror::Error;

/// Result type alias for chat operations
pub type Result<T> = std::result::Result<T, ChatError>;

/// Chat error types
#[derive(Error, Debug)]
pub enum ChatError {
    /// Empty or whitespace-only user input
    #[error("Message text must not be empty")]
    EmptyMessage,

    /// A generation request is already in flight for this session
    #[error("A request is already in flight for this session")]
    RequestInFlight,

    /// Gateway returned 429
    #[error("Rate limited by the generation gateway")]
    RateLimited,

    /// Gateway returned 402
    #[error("Generation credits exhausted")]
    QuotaExhausted,

    /// Streaming exceeded the configured deadline
    #[error("Generation timed out")]
    UpstreamTimeout,

    /// Any other non-success gateway response
    #[error("Gateway error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    /// Transport-level failure while streaming the reply
    #[error("Stream error: {0}")]
    Stream(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChatError {
    /// Whether a manual retry by the user is likely to succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ChatError::RateLimited | ChatError::UpstreamTimeout | ChatError::Stream(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            ChatError::EmptyMessage => "Please enter a message.".into(),
            ChatError::RequestInFlight => {
                "Please wait for the current reply to finish.".into()
            }
            ChatError::RateLimited => {
                "Rate limit exceeded. Please try again in a moment.".into()
            }
            ChatError::QuotaExhausted => {
                "AI credits exhausted. Please add credits to continue.".into()
            }
            ChatError::UpstreamTimeout => {
                "The reply took too long. Please try sending your message again.".into()
            }
            ChatError::Upstream { .. } | ChatError::Stream(_) => {
                "The AI service encountered an error. Please try again.".into()
            }
            ChatError::Config(_) | ChatError::Json(_) => {
                "An unexpected error occurred.".into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_messages_are_distinguishable() {
        let rate = ChatError::RateLimited.user_message();
        let quota = ChatError::QuotaExhausted.user_message();
        let generic = ChatError::Upstream {
            status: 500,
            message: "boom".into(),
        }
        .user_message();

        assert_ne!(rate, quota);
        assert_ne!(rate, generic);
        assert_ne!(quota, generic);
    }

    #[test]
    fn test_retryable() {
        assert!(ChatError::RateLimited.is_retryable());
        assert!(!ChatError::QuotaExhausted.is_retryable());
        assert!(!ChatError::EmptyMessage.is_retryable());
    }
}
