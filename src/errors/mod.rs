//! Error handling module for the portfolio data layer.
//!
//! Provides the client-side error taxonomy with stable error codes, and the error
//! type of the local data service with its mapping to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const HTTP_STATUS: &str = "HTTP_STATUS";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const MISSING_ROW: &str = "MISSING_ROW";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Error codes the local data service answers with (PostgREST / PostgreSQL names).
pub mod service_codes {
    pub const INVALID_QUERY: &str = "PGRST100";
    pub const INVALID_BODY: &str = "PGRST102";
    pub const UNKNOWN_COLUMN: &str = "PGRST204";
    pub const JWT_INVALID: &str = "PGRST301";
    pub const UNDEFINED_TABLE: &str = "42P01";
    pub const INVALID_TEXT: &str = "22P02";
    pub const NOT_NULL_VIOLATION: &str = "23502";
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
    pub const UNIQUE_VIOLATION: &str = "23505";
    pub const INTERNAL: &str = "XX000";
}

/// Client error type.
///
/// `Transport`, `Status`, `Decode` and `MissingRow` together form the recoverable
/// fetch failure family; `Validation` is raised before any request leaves the client.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Network failure, timeout or connection refusal
    Transport(String),
    /// Non-2xx answer from the data service
    Status { status: u16, body: String },
    /// Response body did not have the expected shape
    Decode(String),
    /// A write was acknowledged but echoed no row
    MissingRow(String),
    /// Required field missing or out of range
    Validation(String),
    /// Client could not be constructed from its settings
    Config(String),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => codes::TRANSPORT_ERROR,
            ApiError::Status { .. } => codes::HTTP_STATUS,
            ApiError::Decode(_) => codes::DECODE_ERROR,
            ApiError::MissingRow(_) => codes::MISSING_ROW,
            ApiError::Validation(_) => codes::VALIDATION_ERROR,
            ApiError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ApiError::Transport(msg) => msg.clone(),
            ApiError::Status { status, body } if body.is_empty() => format!("Error: {}", status),
            ApiError::Status { status, body } => format!("Error: {} - {}", status, body),
            ApiError::Decode(msg) => msg.clone(),
            ApiError::MissingRow(msg) => msg.clone(),
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Config(msg) => msg.clone(),
        }
    }

    /// HTTP status carried by this error, if the service answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ApiError::Status { status, .. } => reqwest::StatusCode::from_u16(*status).ok(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(reqwest::StatusCode::NOT_FOUND)
    }

    /// True for failures of the request itself (as opposed to client-side validation).
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_)
                | ApiError::Status { .. }
                | ApiError::Decode(_)
                | ApiError::MissingRow(_)
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(format!("Response decode error: {}", err))
        } else if err.is_builder() {
            ApiError::Config(format!("Request build error: {}", err))
        } else {
            ApiError::Transport(format!("Transport error: {}", err))
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(format!("JSON error: {}", err))
    }
}

/// Local data service error type.
#[derive(Debug)]
pub enum ServiceError {
    /// Malformed query string or body
    BadRequest { code: &'static str, message: String },
    /// Missing or wrong API key
    Unauthorized(String),
    /// Unknown collection
    NotFound { code: &'static str, message: String },
    /// Constraint violation
    Conflict { code: &'static str, message: String },
    /// Database error
    Database(String),
}

impl ServiceError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        ServiceError::BadRequest {
            code,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Conflict { .. } => StatusCode::CONFLICT,
            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest { code, .. } => *code,
            ServiceError::Unauthorized(_) => service_codes::JWT_INVALID,
            ServiceError::NotFound { code, .. } => *code,
            ServiceError::Conflict { code, .. } => *code,
            ServiceError::Database(_) => service_codes::INTERNAL,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ServiceError::BadRequest { message, .. } => message.clone(),
            ServiceError::Unauthorized(msg) => msg.clone(),
            ServiceError::NotFound { message, .. } => message.clone(),
            ServiceError::Conflict { message, .. } => message.clone(),
            ServiceError::Database(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let message = db_err.message().to_string();
            match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    return ServiceError::Conflict {
                        code: service_codes::UNIQUE_VIOLATION,
                        message,
                    }
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    return ServiceError::Conflict {
                        code: service_codes::FOREIGN_KEY_VIOLATION,
                        message,
                    }
                }
                sqlx::error::ErrorKind::NotNullViolation => {
                    return ServiceError::bad_request(service_codes::NOT_NULL_VIOLATION, message)
                }
                _ => {}
            }
        }

        tracing::error!("Database error: {:?}", err);
        ServiceError::Database(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::bad_request(service_codes::INVALID_BODY, format!("JSON error: {}", err))
    }
}

/// Error body in the shape PostgREST uses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &ServiceError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.message(),
            details: None,
            hint: None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::new(&self))).into_response()
    }
}
