//! API request/response types

use serde::{Deserialize, Serialize};

/// Inference request body: one key per trained feature column
///
/// Kept as a raw JSON object because the column set is whatever schema the
/// loaded pipeline was trained with, not a fixed struct.
pub type PredictRequest = serde_json::Map<String, serde_json::Value>;

/// Inference response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Human-readable diagnosis label, "clear" or "heart-disease"
    pub diagnosis: String,
}

/// Diagnosis label for a classifier output
///
/// Total over all class ids: anything outside the trained {0, 1} domain
/// yields `None` and is surfaced as a typed error, never a lookup panic.
pub fn diagnosis_label(class: i32) -> Option<&'static str> {
    match class {
        0 => Some("clear"),
        1 => Some("heart-disease"),
        _ => None,
    }
}
