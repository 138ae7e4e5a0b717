//! Summary view of an inference result.

use super::{InferenceResult, Prediction, Source};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-detection confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DetectionConfidence {
    pub id: String,
    #[serde(rename = "confidence_%")]
    pub confidence_percent: f64,
}

/// Derived summary of one inference result. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InferenceSummary {
    #[serde(rename = "total_people")]
    pub total_detections: usize,
    #[serde(rename = "avg_confidence_%")]
    pub avg_confidence_percent: f64,
    pub detailed_confidences: Vec<DetectionConfidence>,
    /// `"{width}x{height}"`.
    pub image_resolution: String,
    pub inference_time_sec: f64,
    pub source: Source,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

impl Prediction {
    /// Confidence as a percentage rounded to two decimals.
    #[must_use]
    pub fn confidence_percent(&self) -> f64 {
        round_to(self.confidence * 100.0, 2)
    }
}

impl InferenceResult {
    /// Number of detections.
    #[must_use]
    pub fn total_objects(&self) -> usize {
        self.predictions.len()
    }

    /// Mean confidence as a percentage rounded to two decimals; 0 without detections.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_confidence(&self) -> f64 {
        if self.predictions.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.predictions.iter().map(|p| p.confidence).sum();
        round_to(sum / self.predictions.len() as f64 * 100.0, 2)
    }

    /// Builds the summary view, tagged with where the result came from.
    #[must_use]
    pub fn summary(&self, source: Source) -> InferenceSummary {
        InferenceSummary {
            total_detections: self.total_objects(),
            avg_confidence_percent: self.average_confidence(),
            detailed_confidences: self
                .predictions
                .iter()
                .map(|p| DetectionConfidence {
                    id: p.detection_id.clone(),
                    confidence_percent: p.confidence_percent(),
                })
                .collect(),
            image_resolution: format!("{}x{}", self.image.width, self.image.height),
            inference_time_sec: round_to(self.time, 3),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ImageInfo;
    use serde_json::json;

    fn prediction(id: &str, confidence: f64) -> Prediction {
        Prediction {
            detection_id: id.to_string(),
            x: 10.0,
            y: 10.0,
            width: 5.0,
            height: 5.0,
            confidence,
            class_name: "person".to_string(),
            class_id: 0,
        }
    }

    fn result(predictions: Vec<Prediction>) -> InferenceResult {
        InferenceResult {
            inference_id: "inf-1".to_string(),
            time: 0.123_456,
            image: ImageInfo {
                width: 1920,
                height: 1080,
            },
            predictions,
        }
    }

    #[test]
    fn test_summary_of_two_detections() {
        let summary = result(vec![prediction("a", 0.9), prediction("b", 0.8)]).summary(Source::Api);

        assert_eq!(summary.total_detections, 2);
        assert!((summary.avg_confidence_percent - 85.0).abs() < f64::EPSILON);
        assert_eq!(summary.detailed_confidences[0].id, "a");
        assert!((summary.detailed_confidences[0].confidence_percent - 90.0).abs() < f64::EPSILON);
        assert_eq!(summary.image_resolution, "1920x1080");
        assert!((summary.inference_time_sec - 0.123).abs() < f64::EPSILON);
        assert_eq!(summary.source, Source::Api);
    }

    #[test]
    fn test_summary_without_detections() {
        let summary = result(vec![]).summary(Source::Cache);

        assert_eq!(summary.total_detections, 0);
        assert!(summary.avg_confidence_percent.abs() < f64::EPSILON);
        assert!(summary.detailed_confidences.is_empty());
    }

    #[test]
    fn test_confidence_percent_rounds_to_two_decimals() {
        assert!((prediction("a", 0.876_54).confidence_percent() - 87.65).abs() < 1e-9);
    }

    #[test]
    fn test_summary_wire_keys() {
        let summary = result(vec![prediction("a", 0.5)]).summary(Source::Cache);
        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(
            value,
            json!({
                "total_people": 1,
                "avg_confidence_%": 50.0,
                "detailed_confidences": [{"id": "a", "confidence_%": 50.0}],
                "image_resolution": "1920x1080",
                "inference_time_sec": 0.123,
                "source": "cache"
            })
        );
    }
}
