//! # Sightline Core
//!
//! Core types, error definitions, and cross-cutting instrumentation for
//! Sightline. Every other crate in the workspace builds on these.

pub mod domain;
pub mod error;
pub mod id;
pub mod monitor;
pub mod result;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use monitor::*;
pub use result::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::{module, HasComponent, Interface};
