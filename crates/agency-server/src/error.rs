//! API Errors
//!
//! Every rejection is a non-2xx status with `{ "message", "code" }`.

use agency_core::AgencyError;
use agency_payments::PaymentError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: &'static str,
}

/// Handler error
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub code: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code,
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Unauthorized")
    }

    pub fn payments_disabled() -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "PAYMENTS_DISABLED", "Payments not configured")
    }
}

impl From<AgencyError> for ApiError {
    fn from(err: AgencyError) -> Self {
        let (status, code) = match &err {
            AgencyError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AgencyError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AgencyError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AgencyError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AgencyError::Provisioning(_) | AgencyError::Network(_) => {
                (StatusCode::BAD_GATEWAY, "PROVISIONING_ERROR")
            }
            AgencyError::Mail(_) => (StatusCode::BAD_GATEWAY, "MAIL_ERROR"),
            AgencyError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            AgencyError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(error = %err, retryable = err.is_retryable(), "Request failed");
        }

        Self::new(status, code, err.user_message())
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        let (status, code) = match &err {
            PaymentError::InvalidPlan(_) => (StatusCode::BAD_REQUEST, "INVALID_PLAN"),
            PaymentError::MalformedReference(_) => (StatusCode::BAD_REQUEST, "MALFORMED_REFERENCE"),
            PaymentError::SignatureMismatch => (StatusCode::BAD_REQUEST, "INVALID_SIGNATURE"),
            PaymentError::MissingField(_) => (StatusCode::BAD_REQUEST, "MISSING_FIELD"),
            PaymentError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            PaymentError::AgencyNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            PaymentError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            PaymentError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(error = %err, retryable = err.is_retryable(), "Payment request failed");
        } else {
            tracing::warn!(error = %err, "Payment request rejected");
        }

        Self::new(status, code, err.user_message())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            message: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(PaymentError::SignatureMismatch).status, StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(PaymentError::AgencyNotFound("Agency".into())).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(AgencyError::Conflict("taken".into())).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(AgencyError::Storage("down".into())).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_signature_message() {
        let err = ApiError::from(PaymentError::SignatureMismatch);
        assert_eq!(err.message, "Invalid signature");
        assert_eq!(err.code, "INVALID_SIGNATURE");
    }
}
