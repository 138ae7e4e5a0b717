//! Pass-through cache controller.

use crate::responses::{ok, ApiResult, AppError, MessageResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use sightline_core::{validation::rules, SightlineError, ValidateExt};
use std::time::Duration;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query of `POST /cache/set`.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SetCacheQuery {
    /// Cache key.
    #[validate(custom(function = "rules::valid_cache_key"))]
    pub key: String,
    /// Value stored as-is.
    pub value: String,
    /// Expiry in seconds; the entry never expires when absent.
    #[validate(range(min = 1, message = "ttl must be at least one second"))]
    pub ttl: Option<u64>,
}

/// Cached value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CacheValueResponse {
    pub key: String,
    pub value: String,
}

/// Outcome of a delete.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CacheDeleteResponse {
    pub key: String,
    pub deleted: bool,
}

/// Key existence.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CacheExistsResponse {
    pub key: String,
    pub exists: bool,
}

/// Creates the cache router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/set", post(set_cache_value))
        .route("/get/:key", get(get_cache_value))
        .route("/delete/:key", delete(delete_cache_value))
        .route("/exists/:key", get(cache_key_exists))
}

/// Store a value under a key.
#[utoipa::path(
    post,
    path = "/cache/set",
    tag = "cache",
    params(SetCacheQuery),
    responses(
        (status = 200, description = "Value stored", body = MessageResponse),
        (status = 400, description = "Invalid key or ttl", body = sightline_core::ErrorResponse),
        (status = 500, description = "Cache unavailable", body = sightline_core::ErrorResponse)
    )
)]
pub async fn set_cache_value(
    State(state): State<AppState>,
    Query(query): Query<SetCacheQuery>,
) -> ApiResult<MessageResponse> {
    debug!("Set cache request: {}", query.key);

    query.validate_request()?;

    state
        .cache
        .set(&query.key, &query.value, query.ttl.map(Duration::from_secs))
        .await?;

    ok(MessageResponse::new(format!("Key '{}' set successfully", query.key)))
}

/// Read the value stored under a key.
#[utoipa::path(
    get,
    path = "/cache/get/{key}",
    tag = "cache",
    params(("key" = String, Path, description = "Cache key")),
    responses(
        (status = 200, description = "Value found", body = CacheValueResponse),
        (status = 404, description = "Key not found", body = sightline_core::ErrorResponse)
    )
)]
pub async fn get_cache_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<CacheValueResponse> {
    debug!("Get cache request: {}", key);

    let value = state
        .cache
        .get(&key)
        .await?
        .into_value()
        .ok_or_else(|| AppError(SightlineError::not_found("Key", &key)))?;

    ok(CacheValueResponse { key, value })
}

/// Remove a key.
#[utoipa::path(
    delete,
    path = "/cache/delete/{key}",
    tag = "cache",
    params(("key" = String, Path, description = "Cache key")),
    responses(
        (status = 200, description = "Delete outcome", body = CacheDeleteResponse)
    )
)]
pub async fn delete_cache_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<CacheDeleteResponse> {
    debug!("Delete cache request: {}", key);

    let removed = state.cache.delete(&key).await?;
    ok(CacheDeleteResponse {
        key,
        deleted: removed > 0,
    })
}

/// Check whether a key is present.
#[utoipa::path(
    get,
    path = "/cache/exists/{key}",
    tag = "cache",
    params(("key" = String, Path, description = "Cache key")),
    responses(
        (status = 200, description = "Existence flag", body = CacheExistsResponse)
    )
)]
pub async fn cache_key_exists(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<CacheExistsResponse> {
    let exists = state.cache.exists(&key).await?;
    ok(CacheExistsResponse { key, exists })
}
