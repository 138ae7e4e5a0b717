//! Panic-to-response conversion for `CatchPanicLayer`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use super::current_request_id;
use sightline_core::{ErrorResponse, INTERNAL_ERROR_MESSAGE};
use std::any::Any;
use tracing::error;

/// Renders a handler panic as a masked 500 body and logs its payload.
///
/// Runs inside the request scope, so the body echoes the request id.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!("Handler panicked: {}", detail);

    let body = ErrorResponse {
        code: "INTERNAL_ERROR".to_string(),
        message: INTERNAL_ERROR_MESSAGE.to_string(),
        details: None,
        trace_id: current_request_id(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
