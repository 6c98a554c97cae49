//! Response types for the Duty Roster Engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::AuditWarning;

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
    /// Warnings raised while building the roster, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AuditWarning>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            warnings: Vec::new(),
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
            warnings: Vec::new(),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// The month has no assignment satisfying every rule.
    pub fn no_solution(year: i32, month: u32) -> Self {
        Self::with_details(
            "NO_SOLUTION",
            format!("No duty roster satisfies every rule for {}-{:02}", year, month),
            "Relax forbidden weekdays, fairness overrides or the minimum spacing, or add members",
        )
    }

    /// The solver did not answer within its time limit.
    pub fn solver_timeout(limit_ms: u64) -> Self {
        Self::with_details(
            "SOLVER_TIMEOUT",
            format!("The solver did not finish within {} ms", limit_ms),
            "Raise solver.timeout_ms or simplify the roster constraints",
        )
    }

    /// Attaches audit warnings to the error body.
    pub fn with_warnings(mut self, warnings: Vec<AuditWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Too many solver threads are still running.
    pub fn solver_busy(active: usize) -> Self {
        Self::with_details(
            "SOLVER_BUSY",
            format!("{} solver thread(s) are still running", active),
            "Retry once earlier solves have finished or timed out",
        )
    }

    /// The solve was cancelled before it finished.
    pub fn cancelled() -> Self {
        Self::new("CANCELLED", "The solve was cancelled")
    }

    /// An unexpected server-side failure.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs an error body with a status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidConfig { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Invalid configuration", message),
            },
            EngineError::InvalidInput { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_INPUT",
                    format!("Invalid value for '{}': {}", field, message),
                    "year must be 1-9999 and month 1-12",
                ),
            },
            EngineError::Solver { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("SOLVER_ERROR", "Constraint solver failed", message),
            },
            EngineError::InvalidWitness { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "SOLVER_ERROR",
                    "Constraint solver returned an invalid roster",
                    message,
                ),
            },
            err @ EngineError::ExportIo { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("EXPORT_ERROR", "Export failed", err.to_string()),
            },
            EngineError::Export { message } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details("EXPORT_ERROR", "Export failed", message),
            },
        }
    }
}
