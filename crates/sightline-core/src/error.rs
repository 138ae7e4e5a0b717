//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Fixed message returned to clients for unclassified server failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Unified error type for all layers of Sightline.
#[derive(Error, Debug)]
pub enum SightlineError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("{resource_type} '{id}' not found")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict error (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Cache Errors ============
    /// The cache pool was never established; every cache call fails closed.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// A cache command failed on an established connection.
    #[error("Cache error: {0}")]
    Cache(String),

    // ============ Upstream Errors ============
    /// The external inference provider failed (network, timeout, non-2xx, bad payload).
    #[error("Inference provider failed: {detail}")]
    InferenceProvider { status: Option<u16>, detail: String },

    /// The inference payload is missing required fields.
    #[error("Invalid response format from ML model: {0}")]
    MalformedUpstreamResponse(String),

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SightlineError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::InferenceProvider { .. } => 503,
            Self::MalformedUpstreamResponse(_) => 502,
            Self::CacheUnavailable(_)
            | Self::Cache(_)
            | Self::Database(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::CacheUnavailable(_) => "CACHE_UNAVAILABLE",
            Self::Cache(_) => "CACHE_ERROR",
            Self::InferenceProvider { .. } => "INFERENCE_PROVIDER_ERROR",
            Self::MalformedUpstreamResponse(_) => "MALFORMED_UPSTREAM_RESPONSE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for failures whose details must not reach the client.
    #[must_use]
    pub const fn is_unclassified(&self) -> bool {
        self.status_code() == 500
    }

    /// Returns the message safe to show to a client.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.is_unclassified() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an inference provider error.
    #[must_use]
    pub fn inference_provider<T: Into<String>>(status: Option<u16>, detail: T) -> Self {
        Self::InferenceProvider {
            status,
            detail: detail.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for SightlineError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                // PostgreSQL unique violation
                if db_err.code().as_deref() == Some("23505") {
                    return Self::Conflict(db_err.message().to_string());
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for SightlineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    /// Request ID for correlating with server logs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `SightlineError`.
    ///
    /// Unclassified server failures carry a fixed message.
    #[must_use]
    pub fn from_error(error: &SightlineError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.public_message(),
            details: None,
            trace_id: None,
        }
    }

    /// Sets the trace ID.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&SightlineError> for ErrorResponse {
    fn from(error: &SightlineError) -> Self {
        Self::from_error(error)
    }
}
