//! Dependency injection module using Shaku.
//!
//! ```text
//! AppModule
//!   ErrorReportingService ◄──────────────┬────────────┬───────────────┐
//!   DatabasePool ◄── PostgresUserRepository ◄── UserServiceComponent │
//!   RedisCacheStore ◄──────────────────────────── InferenceServiceComponent
//!   RoboflowClient ◄─────────────────────────────┘
//! ```
//!
//! Pools and HTTP clients are built by the caller, then handed to the module
//! as component parameters, so the module itself never performs I/O.

use deadpool_redis::Pool;
use sightline_config::AppConfig;
use sightline_core::{module, SightlineResult};
use sightline_repository::{DatabasePool, PostgresUserRepository};
use sightline_service::{
    ErrorReportingService, InferenceServiceComponent, RedisCacheStore, RoboflowClient, UserServiceComponent,
};
use std::sync::Arc;

module! {
    pub AppModule {
        components = [
            ErrorReportingService,
            DatabasePool,
            PostgresUserRepository,
            RedisCacheStore,
            RoboflowClient,
            UserServiceComponent,
            InferenceServiceComponent,
        ],
        providers = [],
    }
}

/// Builds the application module.
///
/// `redis_pool` is `None` when Redis was unreachable at startup; the cache
/// store then fails every call with `CacheUnavailable`.
pub fn build_app_module(
    config: &AppConfig,
    database: DatabasePool,
    redis_pool: Option<Arc<Pool>>,
) -> SightlineResult<AppModule> {
    let reporter = ErrorReportingService::new(config.app.environment.clone());
    let provider = RoboflowClient::new(&config.inference)?;

    Ok(AppModule::builder()
        .with_component_parameters::<ErrorReportingService>(reporter.into_parameters())
        .with_component_parameters::<DatabasePool>(database.into_parameters())
        .with_component_parameters::<RedisCacheStore>(RedisCacheStore::parameters(redis_pool))
        .with_component_parameters::<RoboflowClient>(provider.into_parameters())
        .with_component_parameters::<InferenceServiceComponent>(InferenceServiceComponent::parameters(
            config.inference.model_id.clone(),
            config.inference.cache_ttl(),
        ))
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shaku::HasComponent;
    use sightline_core::{ErrorReporter, SightlineError};
    use sightline_repository::{DatabasePoolInterface, UserRepository};
    use sightline_service::{CacheStore, InferenceProvider, InferenceService, UserService};

    fn module() -> AppModule {
        let config = AppConfig::default();
        let database = DatabasePool::connect_lazy(&config.database).unwrap();
        build_app_module(&config, database, None).unwrap()
    }

    #[test]
    fn test_has_component_trait_bounds() {
        fn assert_has<T: HasComponent<dyn ErrorReporter>
            + HasComponent<dyn DatabasePoolInterface>
            + HasComponent<dyn UserRepository>
            + HasComponent<dyn CacheStore>
            + HasComponent<dyn InferenceProvider>
            + HasComponent<dyn UserService>
            + HasComponent<dyn InferenceService>>() {
        }
        assert_has::<AppModule>();
    }

    #[tokio::test]
    async fn test_module_resolves_every_component() {
        let module = module();

        let _: Arc<dyn ErrorReporter> = module.resolve();
        let _: Arc<dyn UserRepository> = module.resolve();
        let _: Arc<dyn InferenceProvider> = module.resolve();
        let _: Arc<dyn UserService> = module.resolve();
        let _: Arc<dyn InferenceService> = module.resolve();

        let database: Arc<dyn DatabasePoolInterface> = module.resolve();
        assert!(database.inner().is_ok());
    }

    #[tokio::test]
    async fn test_module_without_redis_fails_cache_calls_closed() {
        let module = module();
        let cache: Arc<dyn CacheStore> = module.resolve();

        let err = cache.get("anything").await.unwrap_err();
        assert!(matches!(err, SightlineError::CacheUnavailable(_)));
    }
}
