//! Application state for Axum handlers.

use shaku::{HasComponent, Module};
use sightline_repository::DatabasePoolInterface;
use sightline_service::{CacheStore, InferenceService, UserService};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn CacheStore>,
    pub inference_service: Arc<dyn InferenceService>,
    pub user_service: Arc<dyn UserService>,
    pub database: Arc<dyn DatabasePoolInterface>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        cache: Arc<dyn CacheStore>,
        inference_service: Arc<dyn InferenceService>,
        user_service: Arc<dyn UserService>,
        database: Arc<dyn DatabasePoolInterface>,
    ) -> Self {
        Self {
            cache,
            inference_service,
            user_service,
            database,
        }
    }

    /// Resolves every handle from a Shaku module.
    pub fn from_module<M>(module: &M) -> Self
    where
        M: Module
            + HasComponent<dyn CacheStore>
            + HasComponent<dyn InferenceService>
            + HasComponent<dyn UserService>
            + HasComponent<dyn DatabasePoolInterface>,
    {
        Self {
            cache: module.resolve(),
            inference_service: module.resolve(),
            user_service: module.resolve(),
            database: module.resolve(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
