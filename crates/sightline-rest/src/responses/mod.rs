//! API response types.

use crate::middleware::current_request_id;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sightline_core::{ErrorResponse, SightlineError};
use tracing::{error, warn};
use utoipa::ToSchema;

/// Plain message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    /// Creates a message body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Application error type for Axum.
///
/// Unclassified server failures are logged with their cause and rendered
/// with a fixed message; the request id is echoed as `trace_id`.
#[derive(Debug)]
pub struct AppError(pub SightlineError);

impl From<SightlineError> for AppError {
    fn from(err: SightlineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_unclassified() {
            error!(code = self.0.error_code(), "Request failed: {}", self.0);
        } else if status.is_server_error() {
            warn!(code = self.0.error_code(), "Upstream failure: {}", self.0);
        }

        let mut body = ErrorResponse::from_error(&self.0);
        if let Some(request_id) = current_request_id() {
            body = body.with_trace_id(request_id);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Helper to create a success response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

/// Helper to create a no content (204) response.
pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}
