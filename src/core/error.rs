//! Typed error handling for the order service
//!
//! Every failure an HTTP caller can observe is one of three categories:
//!
//! - [`ValidationError`]: a required field is missing or has an invalid value
//! - [`NotFoundError`]: the referenced record does not exist
//! - [`StorageError`]: the backing store failed or its contents cannot be
//!   decoded
//!
//! The outer [`ApiError`] maps each category onto an HTTP status and a JSON
//! error body, so handlers can simply return `Result<_, ApiError>`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type surfaced by services and handlers
#[derive(Debug)]
pub enum ApiError {
    /// Input validation errors (missing/invalid request fields)
    Validation(ValidationError),

    /// The referenced record does not exist
    NotFound(NotFoundError),

    /// Storage backend errors
    Storage(StorageError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::NotFound(e) => write!(f, "{}", e),
            ApiError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Validation(e) => Some(e),
            ApiError::NotFound(e) => Some(e),
            ApiError::Storage(e) => Some(e),
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::NotFound(NotFoundError::Order { id }) => {
                Some(serde_json::json!({ "id": id }))
            }
            ApiError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage(e) = &self {
            tracing::error!(error = %e, "storage failure");
        }
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// A required field is missing or empty
    MissingField { field: &'static str },

    /// A field has an unacceptable value
    InvalidValue { field: &'static str, message: String },

    /// Multiple field validation errors (from schema validation)
    FieldErrors(Vec<FieldValidationError>),
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingField { field } => {
                write!(f, "Required field '{}' is missing or empty", field)
            }
            ValidationError::InvalidValue { field, message } => {
                write!(f, "Invalid value for field '{}': {}", field, message)
            }
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        ApiError::Validation(ValidationError::FieldErrors(fields))
    }
}

// =============================================================================
// Not-Found Errors
// =============================================================================

/// Errors for lookups that match no record
#[derive(Debug)]
pub enum NotFoundError {
    /// No order with the given id exists
    Order { id: i64 },
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundError::Order { id } => {
                write!(f, "Order with id '{}' not found", id)
            }
        }
    }
}

impl std::error::Error for NotFoundError {}

impl From<NotFoundError> for ApiError {
    fn from(err: NotFoundError) -> Self {
        ApiError::NotFound(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the file-backed stores
#[derive(Debug)]
pub enum StorageError {
    /// I/O failure while reading or writing the backing file
    Io { path: String, message: String },

    /// The persisted contents cannot be decoded as a valid collection
    Corrupt { path: String, message: String },

    /// The in-memory document failed to encode
    Encode { message: String },

    /// The store is unusable (e.g. poisoned lock)
    Unavailable { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io { path, message } => {
                write!(f, "I/O error on '{}': {}", path, message)
            }
            StorageError::Corrupt { path, message } => {
                write!(f, "Store '{}' is corrupt: {}", path, message)
            }
            StorageError::Encode { message } => {
                write!(f, "Failed to encode document: {}", message)
            }
            StorageError::Unavailable { message } => {
                write!(f, "Store unavailable: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}
