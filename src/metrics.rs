//! Training run metrics
//!
//! A flat record of one training run, persisted as JSON next to the pipeline
//! artifact for manual inspection. No schema versioning; each run overwrites
//! the previous record.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::error::Result;

/// Outcome of one training run
///
/// `acc`/`val_acc` are percentages in [0, 100]; `roc_auc` is a fraction in
/// [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Wall-clock training time in seconds
    pub elapsed: f64,
    /// Training-set accuracy, percent
    pub acc: f64,
    /// Validation-set accuracy, percent
    pub val_acc: f64,
    /// Validation ROC-AUC from the positive-class probability
    pub roc_auc: f64,
    /// Run timestamp, `MM-DD-YYYY, HH:MM:SS`
    pub timestamp: String,
}

impl TrainingMetrics {
    /// Persist the record as JSON, overwriting any previous run's file
    pub fn dump(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a persisted record
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Current local time formatted like the metrics record expects, falling
/// back to UTC when the local offset is unavailable
pub fn format_timestamp() -> String {
    let format = format_description!("[month]-[day]-[year], [hour]:[minute]:[second]");
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&format)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}
