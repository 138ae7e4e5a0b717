//! Image inference controller.

use crate::extractors::ImageForm;
use crate::responses::{ok, ApiResult};
use crate::state::AppState;
use axum::{extract::State, routing::post, Router};
use sightline_service::{CachedResponse, InferenceSummary};
use tracing::debug;

/// Multipart body schema for the upload endpoints.
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct ImageUploadForm {
    /// Image file; its name is part of the cache key.
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Creates the inference router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/raw", post(infer_raw))
        .route("/summary", post(infer_summary))
}

/// Run inference on an image, serving repeated file names from cache.
#[utoipa::path(
    post,
    path = "/infer/raw",
    tag = "inference",
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Raw provider result and its source", body = CachedResponse),
        (status = 400, description = "Missing file", body = sightline_core::ErrorResponse),
        (status = 503, description = "Inference provider failed", body = sightline_core::ErrorResponse)
    )
)]
pub async fn infer_raw(
    State(state): State<AppState>,
    ImageForm(upload): ImageForm,
) -> ApiResult<CachedResponse> {
    debug!(file_name = ?upload.file_name, size = upload.bytes.len(), "Raw inference request");

    let response = state.inference_service.run_inference_with_cache(upload).await?;
    ok(response)
}

/// Run inference on an image and return the detection summary.
#[utoipa::path(
    post,
    path = "/infer/summary",
    tag = "inference",
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Detection summary", body = InferenceSummary),
        (status = 400, description = "Missing file", body = sightline_core::ErrorResponse),
        (status = 502, description = "Provider result had an unexpected shape", body = sightline_core::ErrorResponse),
        (status = 503, description = "Inference provider failed", body = sightline_core::ErrorResponse)
    )
)]
pub async fn infer_summary(
    State(state): State<AppState>,
    ImageForm(upload): ImageForm,
) -> ApiResult<InferenceSummary> {
    debug!(file_name = ?upload.file_name, size = upload.bytes.len(), "Summary inference request");

    let summary = state.inference_service.run_summary_with_cache(upload).await?;
    ok(summary)
}
