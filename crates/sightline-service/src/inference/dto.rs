//! Wire model of a raw inference result.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Prediction {
    pub detection_id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Detection confidence in `[0, 1]`.
    pub confidence: f64,
    #[serde(rename = "class")]
    pub class_name: String,
    pub class_id: i64,
}

/// Dimensions of the analysed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

/// Raw result returned by the inference provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InferenceResult {
    pub inference_id: String,
    /// Provider-side inference time in seconds.
    pub time: f64,
    pub image: ImageInfo,
    pub predictions: Vec<Prediction>,
}
