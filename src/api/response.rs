//! Response types for the attendance ledger API.
//!
//! This module defines the response bodies and the mapping from
//! [`LedgerError`] to HTTP errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::{AttendanceRecord, AttendanceStatus};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an invalid query string error response.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new("INVALID_QUERY", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<LedgerError> for ApiErrorResponse {
    fn from(error: LedgerError) -> Self {
        let message = error.to_string();
        match error {
            LedgerError::InvalidTransition { action, .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "INVALID_TRANSITION",
                    message,
                    format!("The record's current status does not allow '{}'", action),
                ),
            },
            LedgerError::RecordNotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("RECORD_NOT_FOUND", message),
            },
            LedgerError::EmployeeNotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("EMPLOYEE_NOT_FOUND", message),
            },
            LedgerError::Validation { field, .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    message,
                    format!("Check the value of '{}'", field),
                ),
            },
            LedgerError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            LedgerError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            LedgerError::BillingFailed { .. } => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::new("BILLING_FAILED", message),
            },
        }
    }
}

/// Body of `GET /employees/:employee_id/status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// The employee.
    pub employee_id: String,
    /// Status of the open session, or `clocked_out`.
    pub status: AttendanceStatus,
    /// The open session, if any.
    pub open_record: Option<AttendanceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_invalid_transition_is_conflict() {
        let api_error: ApiErrorResponse =
            LedgerError::invalid_transition("start_break", "record is on_break").into();
        assert_eq!(api_error.status, StatusCode::CONFLICT);
        assert_eq!(api_error.error.code, "INVALID_TRANSITION");
        assert!(api_error.error.details.unwrap().contains("start_break"));
    }

    #[test]
    fn test_status_codes_by_variant() {
        let cases: Vec<(LedgerError, StatusCode, &str)> = vec![
            (
                LedgerError::RecordNotFound { id: "x".to_string() },
                StatusCode::NOT_FOUND,
                "RECORD_NOT_FOUND",
            ),
            (
                LedgerError::EmployeeNotFound { id: "x".to_string() },
                StatusCode::NOT_FOUND,
                "EMPLOYEE_NOT_FOUND",
            ),
            (
                LedgerError::validation("per_day_rate", "negative"),
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
            ),
            (
                LedgerError::ConfigNotFound { path: "p".to_string() },
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
            ),
            (
                LedgerError::BillingFailed { message: "down".to_string() },
                StatusCode::BAD_GATEWAY,
                "BILLING_FAILED",
            ),
        ];

        for (error, status, code) in cases {
            let api_error: ApiErrorResponse = error.into();
            assert_eq!(api_error.status, status);
            assert_eq!(api_error.error.code, code);
        }
    }
}
