//! External inference provider client.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use shaku::{Component, Interface};
use sightline_config::InferenceConfig;
use sightline_core::{SightlineError, SightlineResult};
use std::path::Path;
use tracing::debug;

/// Longest slice of an upstream error body kept in error details.
const MAX_ERROR_BODY: usize = 512;

/// Submits a staged image to an inference model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceProvider: Interface + Send + Sync {
    /// Runs `model_id` on the image at `image_path` and returns the raw JSON result.
    ///
    /// Network failures, timeouts, non-2xx responses and non-JSON bodies all
    /// fail with `SightlineError::InferenceProvider`.
    async fn infer(&self, image_path: &Path, model_id: &str) -> SightlineResult<Value>;
}

/// Client for the Roboflow serverless inference API.
///
/// The image is sent base64-encoded as a form body to
/// `{api_url}/{model_id}?api_key=...`.
#[derive(Component)]
#[shaku(interface = InferenceProvider)]
pub struct RoboflowClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl RoboflowClient {
    /// Builds a client with the configured timeout.
    pub fn new(config: &InferenceConfig) -> SightlineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SightlineError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.api_url, &config.api_key))
    }

    /// Wraps an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, api_url: &str, api_key: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Parts for the DI module parameters.
    #[must_use]
    pub fn into_parameters(self) -> RoboflowClientParameters {
        RoboflowClientParameters {
            client: self.client,
            api_url: self.api_url,
            api_key: self.api_key,
        }
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!("{}/{}", self.api_url, model_id.trim_start_matches('/'))
    }
}

fn record_outcome(outcome: &'static str) {
    metrics::counter!("inference_provider_requests_total", "outcome" => outcome).increment(1);
}

#[async_trait]
impl InferenceProvider for RoboflowClient {
    async fn infer(&self, image_path: &Path, model_id: &str) -> SightlineResult<Value> {
        let bytes = tokio::fs::read(image_path).await.map_err(|e| {
            SightlineError::internal(format!("Failed to read staged image {}: {}", image_path.display(), e))
        })?;
        debug!(model_id, size = bytes.len(), "Submitting image for inference");

        // The request URL carries the API key, so reqwest errors are stripped of it.
        let response = self
            .client
            .post(self.endpoint(model_id))
            .query(&[("api_key", self.api_key.as_str())])
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(STANDARD.encode(&bytes))
            .send()
            .await
            .map_err(|e| {
                record_outcome("transport_error");
                SightlineError::inference_provider(None, e.without_url().to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            record_outcome("http_error");
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(SightlineError::inference_provider(
                Some(status.as_u16()),
                format!("Provider returned {}: {}", status, body),
            ));
        }

        let value = response.json::<Value>().await.map_err(|e| {
            record_outcome("invalid_body");
            SightlineError::inference_provider(
                Some(status.as_u16()),
                format!("Provider returned a non-JSON body: {}", e.without_url()),
            )
        })?;

        record_outcome("success");
        Ok(value)
    }
}

impl std::fmt::Debug for RoboflowClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoboflowClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn staged_image(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    fn client_for(server: &MockServer) -> RoboflowClient {
        RoboflowClient::with_client(reqwest::Client::new(), &format!("{}/", server.uri()), "secret-key")
    }

    #[tokio::test]
    async fn test_posts_base64_form_body_and_returns_json() {
        let server = MockServer::start().await;
        let image = staged_image(b"\x89PNG fake image");
        let body = json!({"inference_id": "x", "time": 0.1, "image": {"width": 2, "height": 2}, "predictions": []});

        Mock::given(method("POST"))
            .and(path("/people-detection/3"))
            .and(query_param("api_key", "secret-key"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string(STANDARD.encode(b"\x89PNG fake image")))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let value = client_for(&server)
            .infer(image.path(), "people-detection/3")
            .await
            .unwrap();
        assert_eq!(value, body);
    }

    #[tokio::test]
    async fn test_non_success_status_is_provider_error() {
        let server = MockServer::start().await;
        let image = staged_image(b"img");

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized api_key"))
            .mount(&server)
            .await;

        let err = client_for(&server).infer(image.path(), "m/1").await.unwrap_err();
        match err {
            SightlineError::InferenceProvider { status, detail } => {
                assert_eq!(status, Some(401));
                assert!(detail.contains("Unauthorized"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_provider_error() {
        let server = MockServer::start().await;
        let image = staged_image(b"img");

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).infer(image.path(), "m/1").await.unwrap_err();
        assert_eq!(err.status_code(), 503);
    }

    #[tokio::test]
    async fn test_unreachable_provider_error_hides_api_key() {
        let image = staged_image(b"img");
        let client = RoboflowClient::with_client(reqwest::Client::new(), "http://127.0.0.1:1", "secret-key");

        let err = client.infer(image.path(), "m/1").await.unwrap_err();
        assert!(matches!(err, SightlineError::InferenceProvider { status: None, .. }));
        assert!(!err.to_string().contains("secret-key"));
    }
}
