//! Cache-aside inference pipeline.

use super::{InferenceProvider, InferenceResult, InferenceSummary};
use crate::cache::{cache_keys, CacheLookup, CacheStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shaku::{Component, Interface};
use sightline_core::{monitored, ErrorReporter, Operation, SightlineError, SightlineResult};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

/// Default lifetime of a cached inference result.
pub const INFERENCE_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Extension given to staged uploads whose name has no usable one.
const DEFAULT_STAGED_EXTENSION: &str = "png";

/// Where a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Api,
}

/// Raw inference result tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CachedResponse {
    pub source: Source,
    /// Provider payload, passed through unchanged.
    #[schema(value_type = Object)]
    pub data: Value,
}

/// An uploaded image as received from the client.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Returns the client-supplied file name, rejecting uploads without one.
    pub fn file_name(&self) -> SightlineResult<&str> {
        self.file_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| SightlineError::validation("file: an uploaded file with a file name is required"))
    }

    fn staged_extension(&self) -> &str {
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or(DEFAULT_STAGED_EXTENSION)
    }
}

/// Inference use cases.
#[async_trait]
pub trait InferenceService: Interface + Send + Sync {
    /// Returns the raw result for `upload`, from cache when present.
    async fn run_inference_with_cache(&self, upload: ImageUpload) -> SightlineResult<CachedResponse>;

    /// Returns the summary of the raw result for `upload`.
    async fn run_summary_with_cache(&self, upload: ImageUpload) -> SightlineResult<InferenceSummary>;
}

/// Inference pipeline component for Shaku DI.
#[derive(Component)]
#[shaku(interface = InferenceService)]
pub struct InferenceServiceComponent {
    #[shaku(inject)]
    cache: Arc<dyn CacheStore>,
    #[shaku(inject)]
    provider: Arc<dyn InferenceProvider>,
    #[shaku(inject)]
    reporter: Arc<dyn ErrorReporter>,
    model_id: String,
    #[shaku(default = INFERENCE_CACHE_TTL)]
    cache_ttl: Duration,
}

impl InferenceServiceComponent {
    /// Creates a pipeline for `model_id`.
    #[must_use]
    pub fn new(
        cache: Arc<dyn CacheStore>,
        provider: Arc<dyn InferenceProvider>,
        reporter: Arc<dyn ErrorReporter>,
        model_id: impl Into<String>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            provider,
            reporter,
            model_id: model_id.into(),
            cache_ttl,
        }
    }

    /// DI module parameters.
    #[must_use]
    pub fn parameters(model_id: impl Into<String>, cache_ttl: Duration) -> InferenceServiceComponentParameters {
        InferenceServiceComponentParameters {
            model_id: model_id.into(),
            cache_ttl,
        }
    }

    async fn cached_or_fresh(&self, upload: ImageUpload) -> SightlineResult<CachedResponse> {
        let key = cache_keys::inference(&self.model_id, upload.file_name()?);

        if let CacheLookup::Hit(raw) = self.cache.get(&key).await? {
            match serde_json::from_str::<Value>(&raw) {
                Ok(data) => {
                    metrics::counter!("inference_cache_lookups_total", "result" => "hit").increment(1);
                    debug!(key = %key, "Serving inference result from cache");
                    return Ok(CachedResponse {
                        source: Source::Cache,
                        data,
                    });
                }
                Err(e) => warn!(key = %key, "Discarding undecodable cached inference result: {}", e),
            }
        }
        metrics::counter!("inference_cache_lookups_total", "result" => "miss").increment(1);

        let data = {
            let extension = upload.staged_extension().to_string();
            let staged = stage_upload(upload.bytes, extension).await?;
            monitored(
                self.reporter.as_ref(),
                Operation::new("EXTERNAL_API: Roboflow Inference"),
                self.provider.infer(staged.path(), &self.model_id),
            )
            .await?
        };

        match serde_json::to_string(&data) {
            Ok(serialized) => {
                if let Err(e) = self.cache.set(&key, &serialized, Some(self.cache_ttl)).await {
                    warn!(key = %key, "Failed to cache inference result: {}", e);
                }
            }
            Err(e) => warn!(key = %key, "Failed to serialize inference result: {}", e),
        }

        info!(key = %key, "Inference result computed by provider");
        Ok(CachedResponse {
            source: Source::Api,
            data,
        })
    }
}

/// Writes the upload to a named temporary file.
///
/// The file is deleted when the returned handle is dropped, including when
/// the request future is cancelled.
async fn stage_upload(bytes: Vec<u8>, extension: String) -> SightlineResult<NamedTempFile> {
    tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("sightline-upload-")
            .suffix(&format!(".{extension}"))
            .tempfile()?;
        file.write_all(&bytes)?;
        file.flush()?;
        Ok(file)
    })
    .await
    .map_err(|e| SightlineError::internal(format!("Upload staging task failed: {}", e)))?
    .map_err(|e| SightlineError::internal(format!("Failed to stage upload: {}", e)))
}

#[async_trait]
impl InferenceService for InferenceServiceComponent {
    async fn run_inference_with_cache(&self, upload: ImageUpload) -> SightlineResult<CachedResponse> {
        monitored(
            self.reporter.as_ref(),
            Operation::new("SERVICE: Inference Pipeline"),
            self.cached_or_fresh(upload),
        )
        .await
    }

    async fn run_summary_with_cache(&self, upload: ImageUpload) -> SightlineResult<InferenceSummary> {
        monitored(
            self.reporter.as_ref(),
            Operation::new("SERVICE: Process Result"),
            async {
                let response = self.run_inference_with_cache(upload).await?;
                let result: InferenceResult = serde_json::from_value(response.data)
                    .map_err(|e| SightlineError::MalformedUpstreamResponse(e.to_string()))?;
                Ok(result.summary(response.source))
            },
        )
        .await
    }
}

impl std::fmt::Debug for InferenceServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceServiceComponent")
            .field("model_id", &self.model_id)
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}
