//! Cache-aside image inference.
//!
//! ```text
//! upload ─► InferenceService ─► CacheStore::get ─┬─ hit ─────────────────────► {source: cache}
//!                                                └─ miss ─► InferenceProvider ─► CacheStore::set ─► {source: api}
//! ```

mod client;
mod dto;
mod service;
mod summary;

pub use client::{InferenceProvider, RoboflowClient, RoboflowClientParameters};
pub use dto::{ImageInfo, InferenceResult, Prediction};
pub use service::{
    CachedResponse, ImageUpload, InferenceService, InferenceServiceComponent,
    InferenceServiceComponentParameters, Source, INFERENCE_CACHE_TTL,
};
pub use summary::{DetectionConfidence, InferenceSummary};

#[cfg(test)]
pub use client::MockInferenceProvider;
