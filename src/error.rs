//! Error handling for the payment settings backend
//!
//! This module provides a unified error system with proper HTTP status mapping,
//! user-friendly messages, and structured error codes for client handling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCode {
    // Domain errors (4xx)
    #[serde(rename = "PAYMENT_METHOD_NOT_FOUND")]
    PaymentMethodNotFound,

    // Infrastructure errors (5xx)
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    #[serde(rename = "SAVE_FAILED")]
    SaveFailed,

    // Generic
    #[serde(rename = "VALIDATION_ERROR")]
    ValidationError,
}

/// Domain-specific errors
#[derive(Debug, Clone)]
pub enum DomainError {
    /// No payment method row carries the requested id
    PaymentMethodNotFound { id: String },
}

/// Infrastructure-level errors
#[derive(Debug, Clone)]
pub enum InfrastructureError {
    /// Database connection or query failure
    Database { message: String, is_retryable: bool },
    /// A settings submission could not be committed; nothing was applied
    Persistence { message: String },
}

/// A problem with one submitted form field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Input validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Payment method id is not an integer
    InvalidPaymentMethodId { value: String },
    /// Required field missing
    MissingField { field: String },
    /// One or more submitted fields were rejected
    Fields { errors: Vec<FieldError> },
}

/// Unified application error type
#[derive(Debug, Clone)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub request_id: Option<String>,
}

#[derive(Debug, Clone)]
pub enum AppErrorKind {
    Domain(DomainError),
    Infrastructure(InfrastructureError),
    Validation(ValidationError),
}

impl AppError {
    pub fn new(kind: AppErrorKind) -> Self {
        Self {
            kind,
            request_id: None,
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Domain(DomainError::PaymentMethodNotFound {
            id: id.into(),
        }))
    }

    pub fn fields(errors: Vec<FieldError>) -> Self {
        Self::new(AppErrorKind::Validation(ValidationError::Fields { errors }))
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Map error to HTTP status code
    pub fn status_code(&self) -> u16 {
        match &self.kind {
            AppErrorKind::Domain(err) => match err {
                DomainError::PaymentMethodNotFound { .. } => 404,
            },
            AppErrorKind::Infrastructure(err) => match err {
                InfrastructureError::Database { .. } => 500,
                InfrastructureError::Persistence { .. } => 500,
            },
            AppErrorKind::Validation(err) => match err {
                ValidationError::InvalidPaymentMethodId { .. } => 400,
                ValidationError::MissingField { .. } => 400,
                ValidationError::Fields { .. } => 422, // Unprocessable Entity
            },
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> ErrorCode {
        match &self.kind {
            AppErrorKind::Domain(err) => match err {
                DomainError::PaymentMethodNotFound { .. } => ErrorCode::PaymentMethodNotFound,
            },
            AppErrorKind::Infrastructure(err) => match err {
                InfrastructureError::Database { .. } => ErrorCode::DatabaseError,
                InfrastructureError::Persistence { .. } => ErrorCode::SaveFailed,
            },
            AppErrorKind::Validation(_) => ErrorCode::ValidationError,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match &self.kind {
            AppErrorKind::Domain(err) => match err {
                DomainError::PaymentMethodNotFound { id } => {
                    format!("Payment method '{}' not found", id)
                }
            },
            AppErrorKind::Infrastructure(InfrastructureError::Persistence { .. }) => {
                "Save failed. No settings were changed, please try again".to_string()
            }
            AppErrorKind::Infrastructure(_) => {
                "Service temporarily unavailable. Please try again later".to_string()
            }
            AppErrorKind::Validation(err) => match err {
                ValidationError::InvalidPaymentMethodId { value } => {
                    format!("Invalid payment method id '{}'", value)
                }
                ValidationError::MissingField { field } => {
                    format!("Required field '{}' is missing", field)
                }
                ValidationError::Fields { errors } => match errors.as_slice() {
                    [single] => format!("Field '{}': {}", single.field, single.message),
                    _ => format!("{} fields were rejected", errors.len()),
                },
            },
        }
    }

    /// Field-level detail for validation failures
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match &self.kind {
            AppErrorKind::Validation(ValidationError::Fields { errors }) => Some(errors),
            _ => None,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match &self.kind {
            AppErrorKind::Domain(_) => false,
            AppErrorKind::Infrastructure(err) => match err {
                InfrastructureError::Database { is_retryable, .. } => *is_retryable,
                InfrastructureError::Persistence { .. } => true,
            },
            AppErrorKind::Validation(_) => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for AppError {}

// Note: From<DatabaseError> is implemented in database/error.rs to avoid circular dependency

/// Result type for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = AppError::not_found("42");

        assert_eq!(error.status_code(), 404);
        assert_eq!(error.error_code(), ErrorCode::PaymentMethodNotFound);
        assert!(error.user_message().contains("'42'"));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_field_errors() {
        let error = AppError::fields(vec![FieldError::new(
            "stripe_secret_key",
            "not a setting of provider 'wire_transfer'",
        )]);

        assert_eq!(error.status_code(), 422);
        assert_eq!(error.error_code(), ErrorCode::ValidationError);
        assert!(error.user_message().starts_with("Field 'stripe_secret_key'"));
        assert_eq!(error.field_errors().map(|e| e.len()), Some(1));
    }

    #[test]
    fn test_multiple_field_errors_message() {
        let error = AppError::fields(vec![
            FieldError::new("install", "must be on or off"),
            FieldError::new("telr_sandbox_mode", "unsupported value"),
        ]);

        assert_eq!(error.user_message(), "2 fields were rejected");
    }

    #[test]
    fn test_persistence_error_is_generic() {
        let error = AppError::new(AppErrorKind::Infrastructure(
            InfrastructureError::Persistence {
                message: "deadlock detected".to_string(),
            },
        ));

        assert_eq!(error.status_code(), 500);
        assert_eq!(error.error_code(), ErrorCode::SaveFailed);
        assert!(error.user_message().starts_with("Save failed"));
        assert!(!error.user_message().contains("deadlock"));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_invalid_id_error() {
        let error = AppError::new(AppErrorKind::Validation(
            ValidationError::InvalidPaymentMethodId {
                value: "abc".to_string(),
            },
        ))
        .with_request_id("req_1");

        assert_eq!(error.status_code(), 400);
        assert_eq!(error.request_id.as_deref(), Some("req_1"));
    }
}
