//! # Sightline Service
//!
//! Application services for Sightline: the remote cache client, the
//! inference provider client, the cache-aside inference pipeline, the user
//! service and the error-report sink.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod inference;
pub mod reporting;
pub mod user_service;

pub use cache::*;
pub use dto::*;
pub use inference::*;
pub use r#impl::*;
pub use reporting::*;
pub use user_service::*;
