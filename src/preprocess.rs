//! Column-wise preprocessing transform
//!
//! Mirrors the training contract for tabular features: numeric columns are
//! median-imputed then standardized, categorical columns are constant-imputed
//! then one-hot encoded with unknown categories mapped to all-zero
//! indicators. Statistics and category tables are learned from the train
//! split only and persist inside the pipeline artifact.

use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::dataset::Dataset;

/// Constant used to impute missing categorical cells before encoding
pub const CATEGORICAL_FILL: &str = "missing";

/// Fitted statistics for one numeric column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericStats {
    /// Median of the non-missing train values, used for imputation
    pub median: f64,
    /// Mean of the imputed train values
    pub mean: f64,
    /// Population standard deviation of the imputed train values
    pub std: f64,
}

impl NumericStats {
    fn fit(column: &[Option<f64>]) -> Self {
        let mut present: Vec<f64> = column.iter().filter_map(|v| *v).collect();
        present.sort_by(|a, b| a.total_cmp(b));
        let median = if present.is_empty() {
            0.0
        } else if present.len() % 2 == 1 {
            present[present.len() / 2]
        } else {
            (present[present.len() / 2 - 1] + present[present.len() / 2]) / 2.0
        };

        let imputed: Vec<f64> = column.iter().map(|v| v.unwrap_or(median)).collect();
        let n = imputed.len().max(1) as f64;
        let mean = imputed.iter().sum::<f64>() / n;
        let variance = imputed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Self {
            median,
            mean,
            std: variance.sqrt(),
        }
    }

    /// Impute then standardize one value. A zero-spread column passes
    /// through centered but unscaled.
    pub fn apply(&self, value: Option<f64>) -> f64 {
        let v = value.unwrap_or(self.median);
        let scale = if self.std > 0.0 { self.std } else { 1.0 };
        (v - self.mean) / scale
    }
}

/// Fitted one-hot encoder for one categorical column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEncoder {
    /// Category table learned from the imputed train column, sorted for
    /// a deterministic indicator order
    pub categories: Vec<String>,
}

impl CategoryEncoder {
    fn fit(column: &[Option<String>]) -> Self {
        let mut categories: Vec<String> = column
            .iter()
            .map(|v| v.as_deref().unwrap_or(CATEGORICAL_FILL).to_string())
            .collect();
        categories.sort();
        categories.dedup();
        Self { categories }
    }

    /// Append indicator columns for one value; unknown categories encode as
    /// all zeros rather than failing.
    pub fn apply(&self, value: Option<&str>, out: &mut Vec<f64>) {
        let key = value.unwrap_or(CATEGORICAL_FILL);
        for category in &self.categories {
            out.push(if category == key { 1.0 } else { 0.0 });
        }
    }
}

/// Fitted column-wise preprocessing transform
///
/// Output layout: standardized numeric columns in schema order, then one-hot
/// indicator blocks per categorical column in schema order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    /// Per-numeric-column statistics, parallel to the schema
    pub numeric: Vec<NumericStats>,
    /// Per-categorical-column encoders, parallel to the schema
    pub categorical: Vec<CategoryEncoder>,
}

impl ColumnTransformer {
    /// Learn imputation/scaling statistics and category tables from a
    /// (train-split) dataset
    pub fn fit(dataset: &Dataset) -> Self {
        Self {
            numeric: dataset
                .numeric
                .iter()
                .map(|col| NumericStats::fit(col))
                .collect(),
            categorical: dataset
                .categorical
                .iter()
                .map(|col| CategoryEncoder::fit(col))
                .collect(),
        }
    }

    /// Width of the transformed feature vector
    pub fn output_width(&self) -> usize {
        self.numeric.len()
            + self
                .categorical
                .iter()
                .map(|e| e.categories.len())
                .sum::<usize>()
    }

    /// Transform one row given column-major slices in schema order
    pub fn transform_row(
        &self,
        numeric: &[Option<f64>],
        categorical: &[Option<&str>],
    ) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.output_width());
        for (stats, value) in self.numeric.iter().zip(numeric) {
            out.push(stats.apply(*value));
        }
        for (encoder, value) in self.categorical.iter().zip(categorical) {
            encoder.apply(*value, &mut out);
        }
        out
    }

    /// Transform a whole dataset into a row-major feature matrix
    pub fn transform(&self, dataset: &Dataset) -> DenseMatrix<f64> {
        let nrows = dataset.len();
        let ncols = self.output_width();
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in 0..nrows {
            let numeric: Vec<Option<f64>> =
                dataset.numeric.iter().map(|col| col[row]).collect();
            let categorical: Vec<Option<&str>> = dataset
                .categorical
                .iter()
                .map(|col| col[row].as_deref())
                .collect();
            data.extend(self.transform_row(&numeric, &categorical));
        }
        DenseMatrix::new(nrows, ncols, data, false)
    }
}

/// Canonical category key for a JSON number, so `1` matches the CSV cell
/// `"1"` after encoding
pub fn number_key(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
