//! Error Types

use thiserror::Error;

/// Result type alias for agency operations
pub type Result<T> = std::result::Result<T, AgencyError>;

/// Agency error types
#[derive(Error, Debug)]
pub enum AgencyError {
    /// Caller has no valid session
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request payload failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unique constraint violated (subdomain, email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Underlying store unavailable or write rejected
    #[error("Storage error: {0}")]
    Storage(String),

    /// Subdomain DNS/deployment provisioning failed
    #[error("Provisioning error: {0}")]
    Provisioning(String),

    /// Outbound email failed
    #[error("Mail error: {0}")]
    Mail(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error talking to an external API
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl AgencyError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AgencyError::Storage(_)
                | AgencyError::Provisioning(_)
                | AgencyError::Mail(_)
                | AgencyError::Network(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AgencyError::Unauthorized(_) => "Unauthorized".into(),
            AgencyError::NotFound(what) => format!("{what} not found"),
            AgencyError::Validation(msg) | AgencyError::Conflict(msg) => msg.clone(),
            AgencyError::Provisioning(_) | AgencyError::Network(_) => {
                "Subdomain provisioning failed. Please try again.".into()
            }
            AgencyError::Mail(_) => "Could not send email. Please try again.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}
