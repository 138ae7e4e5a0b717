//! User management controller.

use crate::{
    extractors::ValidatedJson,
    responses::{created, no_content, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sightline_core::UserId;
use sightline_service::{CreateUserRequest, ListUsersQuery, UpdateUserRequest, UserResponse};
use tracing::debug;

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// List users.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users in id order", body = Vec<UserResponse>)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Vec<UserResponse>> {
    debug!("List users request");

    let users = state.user_service.list_users(query).await?;
    ok(users)
}

/// Create a new user.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 409, description = "Email already registered", body = sightline_core::ErrorResponse),
        (status = 422, description = "Invalid request", body = sightline_core::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    debug!("Create user request: {}", request.email);

    let user = state.user_service.create_user(request).await?;
    Ok(created(user))
}

/// Get a user by ID.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = sightline_core::ErrorResponse)
    )
)]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<UserResponse> {
    debug!("Get user request: {}", id);

    let user = state.user_service.get_user(UserId(id)).await?;
    ok(user)
}

/// Update a user.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found", body = sightline_core::ErrorResponse),
        (status = 409, description = "Email already registered", body = sightline_core::ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    debug!("Update user request: {}", id);

    let user = state.user_service.update_user(UserId(id), request).await?;
    ok(user)
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = sightline_core::ErrorResponse)
    )
)]
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    debug!("Delete user request: {}", id);

    state.user_service.delete_user(UserId(id)).await?;
    Ok(no_content())
}
