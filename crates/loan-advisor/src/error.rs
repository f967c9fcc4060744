//! Error Types for the Lending Domain

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Unknown mock profile identifier
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Session-level validation failure or upstream chat error
    #[error(transparent)]
    Chat(#[from] lendora_core::ChatError),

    /// Session has not produced a decision yet
    #[error("No decision available: session has not reached the sanction stage")]
    NoDecision,

    /// Session was used before a profile was selected
    #[error("No active session: select a profile first")]
    NoActiveSession,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdvisorError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AdvisorError::ProfileNotFound(id) => {
                format!("The demo profile '{id}' does not exist.")
            }
            AdvisorError::Chat(e) => e.user_message(),
            AdvisorError::NoDecision => {
                "The loan decision is not ready yet. Complete the conversation first.".into()
            }
            AdvisorError::NoActiveSession => "Select a demo profile to start.".into(),
            AdvisorError::Serialization(_) => "An unexpected error occurred.".into(),
        }
    }
}
