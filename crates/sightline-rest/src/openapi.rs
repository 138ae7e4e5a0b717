//! OpenAPI documentation configuration.

use crate::controllers::cache_controller::{CacheDeleteResponse, CacheExistsResponse, CacheValueResponse};
use crate::controllers::inference_controller::ImageUploadForm;
use crate::controllers::{HealthResponse, ReadinessResponse};
use crate::responses::MessageResponse;
use sightline_core::{ErrorResponse, FieldError, UserId};
use sightline_service::{
    CachedResponse, CreateUserRequest, DetectionConfidence, InferenceSummary, Source, UpdateUserRequest,
    UserResponse,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the Sightline API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sightline API",
        version = "1.0.0",
        description = "Cache-aside image inference, pass-through cache access and user records",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::router::root,
        // Cache endpoints
        crate::controllers::cache_controller::set_cache_value,
        crate::controllers::cache_controller::get_cache_value,
        crate::controllers::cache_controller::delete_cache_value,
        crate::controllers::cache_controller::cache_key_exists,
        // Inference endpoints
        crate::controllers::inference_controller::infer_raw,
        crate::controllers::inference_controller::infer_summary,
        // User endpoints
        crate::controllers::user_controller::list_users,
        crate::controllers::user_controller::create_user,
        crate::controllers::user_controller::get_user,
        crate::controllers::user_controller::update_user,
        crate::controllers::user_controller::delete_user,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            UserId,
            ErrorResponse,
            FieldError,
            MessageResponse,
            CacheValueResponse,
            CacheDeleteResponse,
            CacheExistsResponse,
            ImageUploadForm,
            Source,
            CachedResponse,
            DetectionConfidence,
            InferenceSummary,
            CreateUserRequest,
            UpdateUserRequest,
            UserResponse,
            HealthResponse,
            ReadinessResponse,
        )
    ),
    tags(
        (name = "cache", description = "Pass-through cache access"),
        (name = "inference", description = "Cached image inference"),
        (name = "users", description = "User records"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/",
            "/cache/set",
            "/cache/get/{key}",
            "/infer/raw",
            "/infer/summary",
            "/users",
            "/users/{id}",
            "/health",
            "/ready",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
