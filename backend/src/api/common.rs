//! Error handling utilities for API responses.
//!
//! Provides structured error responses and conversion between service-layer errors
//! and HTTP responses. Includes:
//! - Standard response envelope
//! - ServiceError to HTTP status code mapping
//! - Validation error formatting helpers
//!
//! # Response Format
//! All errors return consistent JSON responses containing:
//! - `message`: Human-readable message
//! - `error.error_type`: Machine-readable error category
//! - `error.details`: Optional field-specific validation errors

use crate::errors::ServiceError;
use axum::http::StatusCode;
use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Indicates if the request was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message
    pub message: String,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    /// Response timestamp
    pub timestamp: String,
}

/// Error details for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    /// Machine-readable error type identifier
    pub error_type: String,
    /// Field-specific validation errors when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-specific validation error details
#[derive(Debug, Serialize)]
pub struct FieldError {
    /// Name of the field with validation error
    pub field: String,
    /// Description of the validation failure
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create an error response
    pub fn error(
        message: impl Into<String>,
        error_type: impl Into<String>,
        details: Option<Vec<FieldError>>,
    ) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: message.into(),
            error: Some(ErrorDetails {
                error_type: error_type.into(),
                details,
            }),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Builds an `(status, body)` pair carrying the standard error envelope.
pub fn error_response(
    status: StatusCode,
    message: impl Into<String>,
    error_type: &str,
    details: Option<Vec<FieldError>>,
) -> (StatusCode, String) {
    let error_response = ApiResponse::<()>::error(message, error_type, details);
    (
        status,
        serde_json::to_string(&error_response).unwrap_or_default(),
    )
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> (StatusCode, String) {
    let (status, error_type, message) = match error {
        ServiceError::AuthFailed => (
            StatusCode::UNAUTHORIZED,
            "auth_failed",
            "Invalid credentials".to_string(),
        ),
        ServiceError::DuplicateEmail { email } => (
            StatusCode::CONFLICT,
            "duplicate_email",
            format!("A user with email '{}' already exists", email),
        ),
        ServiceError::TokenNotFound => (
            StatusCode::UNAUTHORIZED,
            "token_not_found",
            "Invalid token".to_string(),
        ),
        ServiceError::AlreadyExists { entity, identifier } => (
            StatusCode::CONFLICT,
            "already_exists",
            format!("{} '{}' already exists", entity, identifier),
        ),
        ServiceError::Validation { message } => {
            (StatusCode::BAD_REQUEST, "validation_error", message)
        }
        ServiceError::Database { source } => {
            tracing::error!("Database error: {:#}", source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Internal server error".to_string(),
            )
        }
        ServiceError::InternalError { message } => {
            tracing::error!("Internal error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            )
        }
    };

    error_response(status, message, error_type, None)
}

/// Formats validator::ValidationErrors into field-specific error details
pub fn validation_errors_to_field_errors(errors: validator::ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .unwrap_or(&"Invalid value".into())
                    .to_string(),
            })
        })
        .collect()
}

/// Helper to create validation error response
pub fn validation_error_response(errors: validator::ValidationErrors) -> (StatusCode, String) {
    let field_errors = validation_errors_to_field_errors(errors);
    error_response(
        StatusCode::BAD_REQUEST,
        "Validation failed",
        "validation_error",
        Some(field_errors),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parse(body: &str) -> Value {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn duplicate_email_maps_to_conflict() {
        let (status, body) = service_error_to_http(ServiceError::duplicate_email("a@x.com"));
        assert_eq!(status, StatusCode::CONFLICT);

        let body = parse(&body);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["error_type"], "duplicate_email");
    }

    #[test]
    fn auth_failures_map_to_unauthorized() {
        let (status, _) = service_error_to_http(ServiceError::AuthFailed);
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = service_error_to_http(ServiceError::TokenNotFound);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(parse(&body)["error"]["error_type"], "token_not_found");
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let (status, body) =
            service_error_to_http(ServiceError::validation("Password must be at most 72 bytes"));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body = parse(&body);
        assert_eq!(body["error"]["error_type"], "validation_error");
        assert_eq!(body["message"], "Password must be at most 72 bytes");
    }

    #[test]
    fn database_errors_do_not_leak_details() {
        let error: ServiceError = anyhow::anyhow!("UNIQUE constraint failed: users.email").into();
        let (status, body) = service_error_to_http(error);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("UNIQUE"));
        assert_eq!(parse(&body)["message"], "Internal server error");
    }

    #[test]
    fn success_envelope_skips_error() {
        let response = ApiResponse::success("ok", "done");
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], "ok");
        assert!(body.get("error").is_none());
    }
}
