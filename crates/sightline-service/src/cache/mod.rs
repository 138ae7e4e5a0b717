//! Remote cache access for the service layer.
//!
//! [`CacheStore`] is the contract; [`RedisCacheStore`] is the production
//! implementation backed by a shared `deadpool-redis` pool.

mod cache_store;
pub mod cache_keys;
mod redis_cache;

#[cfg(any(test, feature = "test-utils"))]
mod memory;

pub use cache_store::{CacheLookup, CacheStore};
pub use redis_cache::{connect_pool, RedisCacheStore, RedisCacheStoreParameters};

#[cfg(any(test, feature = "test-utils"))]
pub use memory::{InMemoryCacheStore, RecordedWrite};
