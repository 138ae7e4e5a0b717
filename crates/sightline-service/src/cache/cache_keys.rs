//! Cache key generators for consistent key naming.

/// Prefix of every cached inference result.
const INFERENCE_PREFIX: &str = "inference";

/// Cache key for an inference result: `inference:{model_id}:{file_name}`.
///
/// Only the file name identifies the image, so two different uploads that
/// share a name share a cache entry for the lifetime of the TTL.
#[must_use]
pub fn inference(model_id: &str, file_name: &str) -> String {
    format!("{}:{}:{}", INFERENCE_PREFIX, model_id, file_name)
}
