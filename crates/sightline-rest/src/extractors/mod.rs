//! Custom Axum extractors.

mod upload;
mod validated;

pub use upload::*;
pub use validated::*;
