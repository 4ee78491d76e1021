//! Error types for every layer of the service.
//!
//! - [`RepositoryError`] - raised by storage backends
//! - [`RegistryError`] - transport-agnostic business errors returned by the registry
//! - [`AppError`] - HTTP-facing errors rendered as JSON responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Errors raised by [`crate::domain::repositories::UrlRepository`] implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("short code `{0}` already exists")]
    AlreadyExists(String),

    #[error("long URL is already indexed under `{0}`")]
    DuplicateLongUrl(String),

    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("corrupt record `{code}`: {reason}")]
    Corrupt { code: String, reason: String },
}

/// Errors returned by [`crate::application::services::RegistryService`].
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("keyword `{0}` is already taken")]
    KeywordTaken(String),

    #[error("short code `{0}` not found")]
    NotFound(String),

    #[error("no free short code after {attempts} attempts")]
    ExhaustedKeyspace { attempts: usize },

    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("storage failure: {0}")]
    Persistence(#[source] RepositoryError),
}

impl From<RepositoryError> for RegistryError {
    fn from(e: RepositoryError) -> Self {
        tracing::error!("Storage operation failed: {}", e);
        Self::Persistence(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload embedded in API responses.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// HTTP-facing error rendered as `{ "error": { "code", "message", "details" } }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::KeywordTaken(keyword) => AppError::conflict(
                "Custom keyword is already taken",
                json!({ "keyword": keyword }),
            ),
            RegistryError::NotFound(code) => {
                AppError::not_found("Short link not found", json!({ "code": code }))
            }
            RegistryError::InvalidInput(reason) => {
                AppError::bad_request("Invalid input", json!({ "reason": reason }))
            }
            RegistryError::ExhaustedKeyspace { attempts } => AppError::internal(
                "Failed to generate unique code",
                json!({ "attempts": attempts }),
            ),
            RegistryError::Persistence(_) => AppError::internal("Storage error", json!({})),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(e.field_errors()).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}
