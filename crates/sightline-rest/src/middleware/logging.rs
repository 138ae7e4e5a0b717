//! Request logging middleware.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, info_span, Instrument};

/// Header carrying the request id, set by `SetRequestIdLayer` upstream.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Returns the id of the request being handled on this task, if any.
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(Clone::clone).ok()
}

/// Request logging middleware.
///
/// Runs the rest of the stack inside a `request` span tagged with the
/// request id, so every log line emitted while handling the request can be
/// correlated with the `trace_id` of an error body.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let span = info_span!("request", request_id = %request_id, method = %method, uri = %uri);
    let start = Instant::now();

    let response = REQUEST_ID
        .scope(request_id, next.run(request))
        .instrument(span.clone())
        .await;

    let duration = start.elapsed();
    let status = response.status();

    span.in_scope(|| {
        info!(
            target: "http",
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "HTTP request completed"
        );
    });

    response
}
