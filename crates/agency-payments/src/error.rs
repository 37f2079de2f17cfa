//! Payment Error Types

use agency_core::AgencyError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Requested or referenced plan is not one we sell
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    /// Payment reference does not have the `{agency}-{plan}` shape
    #[error("Malformed payment reference: {0}")]
    MalformedReference(String),

    /// Notification signature does not match the recomputed digest
    #[error("Notification signature invalid")]
    SignatureMismatch,

    /// Notification is missing a required field
    #[error("Missing notification field: {0}")]
    MissingField(&'static str),

    /// Store rejected the input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced agency does not exist
    #[error("Agency not found: {0}")]
    AgencyNotFound(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::Storage(_))
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            PaymentError::InvalidPlan(_) => "Invalid plan selected",
            PaymentError::MalformedReference(_) => "Malformed payment reference",
            PaymentError::SignatureMismatch => "Invalid signature",
            PaymentError::MissingField(_) => "Incomplete payment notification",
            PaymentError::Validation(msg) => msg.as_str(),
            PaymentError::AgencyNotFound(_) => "Agency not found",
            PaymentError::Config(_) => "Service configuration error.",
            PaymentError::Storage(_) => "An error occurred processing your request.",
        }
    }
}

impl From<AgencyError> for PaymentError {
    fn from(err: AgencyError) -> Self {
        match err {
            AgencyError::NotFound(what) => PaymentError::AgencyNotFound(what),
            AgencyError::Validation(msg) => PaymentError::Validation(msg),
            AgencyError::Config(msg) => PaymentError::Config(msg),
            other => PaymentError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_storage_is_retryable() {
        assert!(PaymentError::Storage("db down".into()).is_retryable());
        assert!(!PaymentError::SignatureMismatch.is_retryable());
        assert!(!PaymentError::MalformedReference("x".into()).is_retryable());
    }

    #[test]
    fn test_store_errors_map_to_payment_errors() {
        let not_found: PaymentError = AgencyError::NotFound("Agency".into()).into();
        assert!(matches!(not_found, PaymentError::AgencyNotFound(_)));

        let storage: PaymentError = AgencyError::Storage("timeout".into()).into();
        assert!(storage.is_retryable());
    }

    #[test]
    fn test_store_validation_is_not_an_invalid_plan() {
        let err: PaymentError = AgencyError::Validation("Invalid subdomain: -x".into()).into();
        assert!(matches!(err, PaymentError::Validation(_)));
        assert_eq!(err.user_message(), "Invalid subdomain: -x");
    }
}
