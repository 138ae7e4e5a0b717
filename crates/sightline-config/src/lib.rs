//! # Sightline Config
//!
//! Configuration management for Sightline.
//! Supports layered configuration from TOML files and environment variables,
//! including the flat variable names used by existing deployments.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
