//! # Sightline Repository
//!
//! Data access for Sightline.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>   (domain interface)
//! PostgresUserRepository         (SQLx)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! Postgres
//! ```
//!
//! The schema lives in the workspace `migrations/` directory and is applied
//! with [`DatabasePoolInterface::run_migrations`].

pub mod pool;
pub mod postgres;
pub mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use pool::*;
pub use postgres::*;
pub use traits::*;
