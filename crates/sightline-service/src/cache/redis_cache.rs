//! Redis-based cache implementation.

use super::{CacheLookup, CacheStore};
use async_trait::async_trait;
use deadpool_redis::{Config, Connection, Pool, PoolConfig, Runtime};
use redis::AsyncCommands;
use shaku::Component;
use sightline_config::RedisConfig;
use sightline_core::{monitored, ErrorReporter, Operation, SightlineError, SightlineResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Redis-based cache store.
#[derive(Component)]
#[shaku(interface = CacheStore)]
pub struct RedisCacheStore {
    /// Redis connection pool; `None` when the startup connection failed.
    pool: Option<Arc<Pool>>,

    #[shaku(inject)]
    reporter: Arc<dyn ErrorReporter>,
}

impl RedisCacheStore {
    /// Creates a store over an established pool.
    #[must_use]
    pub fn new(pool: Arc<Pool>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            pool: Some(pool),
            reporter,
        }
    }

    /// Creates a store whose every call fails with `CacheUnavailable`.
    #[must_use]
    pub fn disconnected(reporter: Arc<dyn ErrorReporter>) -> Self {
        Self { pool: None, reporter }
    }

    /// DI module parameters; `None` builds a disconnected store.
    #[must_use]
    pub fn parameters(pool: Option<Arc<Pool>>) -> RedisCacheStoreParameters {
        RedisCacheStoreParameters { pool }
    }

    /// Returns true when a pool was established at startup.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.pool.is_some()
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> SightlineResult<Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                SightlineError::Cache(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(SightlineError::CacheUnavailable(
                "Redis client is not initialized. Check startup logs.".to_string(),
            )),
        }
    }
}

/// Builds the connection pool and verifies it with a PING.
///
/// `rediss://` URLs connect over TLS; with `tls_insecure` the server
/// certificate is not verified.
pub async fn connect_pool(config: &RedisConfig) -> SightlineResult<Arc<Pool>> {
    let mut url = config.url.clone();
    if config.tls_insecure && url.starts_with("rediss://") && !url.ends_with("#insecure") {
        url.push_str("#insecure");
    }

    let mut pool_config = PoolConfig::new(config.pool_size);
    pool_config.timeouts.wait = Some(config.timeout());
    pool_config.timeouts.create = Some(config.timeout());
    pool_config.timeouts.recycle = Some(config.timeout());

    let mut cfg = Config::from_url(url);
    cfg.pool = Some(pool_config);

    let pool = cfg
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| SightlineError::Configuration(format!("Invalid Redis configuration: {}", e)))?;

    let mut conn = pool
        .get()
        .await
        .map_err(|e| SightlineError::CacheUnavailable(format!("Failed to connect to Redis: {}", e)))?;
    let _: String = redis::cmd("PING")
        .query_async(&mut conn)
        .await
        .map_err(|e| SightlineError::CacheUnavailable(format!("Redis PING failed: {}", e)))?;

    info!("Redis connection established successfully");
    Ok(Arc::new(pool))
}

fn command_error(action: &str, key: &str, err: redis::RedisError) -> SightlineError {
    SightlineError::Cache(format!("Failed to {} key '{}': {}", action, key, err))
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> SightlineResult<CacheLookup> {
        monitored(
            self.reporter.as_ref(),
            Operation::new("REDIS: GET").with_args(format!("key={key}")),
            async {
                let mut conn = self.get_conn().await?;
                let value: Option<String> = conn
                    .get(key)
                    .await
                    .map_err(|e| command_error("get", key, e))?;

                match &value {
                    Some(_) => debug!("Cache hit for key '{}'", key),
                    None => debug!("Cache miss for key '{}'", key),
                }
                Ok(CacheLookup::from(value))
            },
        )
        .await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> SightlineResult<()> {
        monitored(
            self.reporter.as_ref(),
            Operation::new("REDIS: SET").with_args(format!("key={key} ttl={ttl:?}")),
            async {
                let mut conn = self.get_conn().await?;
                match ttl {
                    Some(ttl) => {
                        let ttl_secs = ttl.as_secs().max(1);
                        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
                            .await
                            .map_err(|e| command_error("set", key, e))?;
                        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
                    }
                    None => {
                        conn.set::<_, _, ()>(key, value)
                            .await
                            .map_err(|e| command_error("set", key, e))?;
                        debug!("Cached key '{}' without expiry", key);
                    }
                }
                Ok(())
            },
        )
        .await
    }

    async fn delete(&self, key: &str) -> SightlineResult<u64> {
        monitored(
            self.reporter.as_ref(),
            Operation::new("REDIS: DELETE").with_args(format!("key={key}")),
            async {
                let mut conn = self.get_conn().await?;
                let removed: u64 = conn
                    .del(key)
                    .await
                    .map_err(|e| command_error("delete", key, e))?;
                Ok(removed)
            },
        )
        .await
    }

    async fn exists(&self, key: &str) -> SightlineResult<bool> {
        monitored(
            self.reporter.as_ref(),
            Operation::new("REDIS: EXISTS").with_args(format!("key={key}")),
            async {
                let mut conn = self.get_conn().await?;
                let exists: bool = conn
                    .exists(key)
                    .await
                    .map_err(|e| command_error("check", key, e))?;
                Ok(exists)
            },
        )
        .await
    }

    async fn ping(&self) -> SightlineResult<()> {
        let mut conn = self.get_conn().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| SightlineError::Cache(format!("Redis PING failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightline_core::testing::RecordingReporter;

    #[tokio::test]
    async fn test_disconnected_store_fails_closed() {
        let reporter = Arc::new(RecordingReporter::default());
        let cache = RedisCacheStore::disconnected(reporter.clone());
        assert!(!cache.is_connected());

        let err = cache.get("any").await.unwrap_err();
        assert!(matches!(err, SightlineError::CacheUnavailable(_)));
        assert_eq!(err.status_code(), 500);

        assert!(matches!(
            cache.set("any", "v", None).await,
            Err(SightlineError::CacheUnavailable(_))
        ));
        assert!(cache.ping().await.is_err());

        let reports = reporter.reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].operation, "REDIS: GET");
        assert_eq!(reports[1].operation, "REDIS: SET");
    }

    #[tokio::test]
    async fn test_connect_pool_rejects_unreachable_server() {
        let config = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            timeout_secs: 1,
            ..RedisConfig::default()
        };
        assert!(connect_pool(&config).await.is_err());
    }
}
