//! REST API controllers.

pub mod cache_controller;
pub mod health_controller;
pub mod inference_controller;
pub mod user_controller;

pub use health_controller::{HealthResponse, ReadinessResponse};
