//! Main application router.

use crate::{
    controllers::{cache_controller, health_controller, inference_controller, user_controller},
    middleware::{handle_panic, logging_middleware},
    openapi::ApiDoc,
    responses::MessageResponse,
    state::AppState,
};
use axum::{extract::DefaultBodyLimit, http::HeaderValue, middleware, routing::get, Json, Router};
use shaku::{HasComponent, Module};
use sightline_config::ServerConfig;
use sightline_repository::DatabasePoolInterface;
use sightline_service::{CacheStore, InferenceService, UserService};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router from a Shaku module.
pub fn create_router_from_module<M>(module: &M, server_config: &ServerConfig) -> Router
where
    M: Module
        + HasComponent<dyn CacheStore>
        + HasComponent<dyn InferenceService>
        + HasComponent<dyn UserService>
        + HasComponent<dyn DatabasePoolInterface>,
{
    create_router(AppState::from_module(module), server_config)
}

/// Creates the main application router.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/", get(root))
        .merge(health_controller::router())
        .nest("/cache", cache_controller::router())
        .nest("/infer", inference_controller::router())
        .nest("/users", user_controller::router())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        // Inside the logging middleware so panics are rendered within the request span.
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(logging_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(server_config.request_timeout()))
                .layer(CompressionLayer::new())
                .layer(create_cors_layer(server_config)),
        );

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }
    if server_config.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint.
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Welcome message", body = MessageResponse)
    )
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "Welcome to the Sightline service. Check /swagger-ui for endpoints.",
    ))
}
