//! # Sightline REST
//!
//! Axum HTTP surface for Sightline: the pass-through cache API, cached image
//! inference, user records, health probes and the OpenAPI document.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
