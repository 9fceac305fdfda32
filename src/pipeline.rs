//! Preprocessing + classification pipeline
//!
//! The [`Pipeline`] is the single persisted artifact: feature schema, fitted
//! column transformer, and a binary logistic classifier, serialized as one
//! opaque bincode blob. The serving side loads it read-only; the training
//! side overwrites it in place on each run (no atomic replace, no
//! versioning).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::LogisticRegression;

use crate::dataset::Dataset;
use crate::error::{LatirError, Result};
use crate::preprocess::{number_key, ColumnTransformer};
use crate::schema::FeatureSchema;

/// Fitted preprocessing + classification pipeline
#[derive(Debug, Serialize, Deserialize)]
pub struct Pipeline {
    /// Columns the pipeline was trained on
    pub schema: FeatureSchema,
    /// Fitted column-wise transform
    pub transformer: ColumnTransformer,
    classifier: LogisticRegression<f64, i32, DenseMatrix<f64>, Vec<i32>>,
}

impl Pipeline {
    /// Fit transformer and classifier on a (train-split) dataset
    pub fn fit(schema: FeatureSchema, train: &Dataset) -> Result<Self> {
        let transformer = ColumnTransformer::fit(train);
        let x = transformer.transform(train);
        let classifier = LogisticRegression::fit(&x, &train.labels, Default::default())?;
        Ok(Self {
            schema,
            transformer,
            classifier,
        })
    }

    /// Predict class labels for every row of a dataset
    pub fn predict(&self, dataset: &Dataset) -> Result<Vec<i32>> {
        let x = self.transformer.transform(dataset);
        Ok(self.classifier.predict(&x)?)
    }

    /// Positive-class probability for every row of a dataset
    ///
    /// smartcore's logistic regression exposes no probability output, so
    /// this applies the sigmoid to the stored decision function directly.
    pub fn predict_proba(&self, dataset: &Dataset) -> Vec<f64> {
        let x = self.transformer.transform(dataset);
        let weights = self.flat_coefficients();
        let bias = self.intercept_value();
        let (nrows, ncols) = x.shape();
        (0..nrows)
            .map(|i| {
                // as_slice avoids resolving to the Array trait's get()
                let z: f64 = bias
                    + (0..ncols)
                        .map(|j| x.get((i, j)) * weights.as_slice().get(j).copied().unwrap_or(0.0))
                        .sum::<f64>();
                1.0 / (1.0 + (-z).exp())
            })
            .collect()
    }

    /// Predict the class of a single JSON record
    ///
    /// Every schema column must be present as a key; a key mapped to `null`
    /// is treated as a missing cell and imputed, but an absent key is a
    /// column-alignment error.
    pub fn predict_record(&self, record: &serde_json::Map<String, Value>) -> Result<i32> {
        let mut numeric: Vec<Option<f64>> = Vec::with_capacity(self.schema.numeric.len());
        for name in &self.schema.numeric {
            numeric.push(numeric_cell(record, name)?);
        }

        let mut categorical: Vec<Option<String>> =
            Vec::with_capacity(self.schema.categorical.len());
        for name in &self.schema.categorical {
            categorical.push(categorical_cell(record, name)?);
        }
        let categorical_refs: Vec<Option<&str>> =
            categorical.iter().map(|v| v.as_deref()).collect();

        let row = self.transformer.transform_row(&numeric, &categorical_refs);
        let ncols = row.len();
        let x = DenseMatrix::new(1, ncols, row, false);
        let prediction = self.classifier.predict(&x)?;
        prediction
            .first()
            .copied()
            .ok_or(LatirError::UnknownClass { class: -1 })
    }

    /// Persist the pipeline to `path`, overwriting any existing artifact
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = bincode::serialize(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a persisted pipeline
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Ok(bincode::deserialize(&bytes)?)
    }

    /// Classifier coefficients flattened in feature order, regardless of
    /// the stored matrix orientation
    fn flat_coefficients(&self) -> Vec<f64> {
        let coef = self.classifier.coefficients();
        let (rows, cols) = coef.shape();
        let mut flat = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                flat.push(*coef.get((i, j)));
            }
        }
        flat
    }

    fn intercept_value(&self) -> f64 {
        let intercept = self.classifier.intercept();
        let (rows, cols) = intercept.shape();
        if rows == 0 || cols == 0 {
            0.0
        } else {
            *intercept.get((0, 0))
        }
    }
}

/// Extract a numeric cell from a JSON record
fn numeric_cell(record: &serde_json::Map<String, Value>, name: &str) -> Result<Option<f64>> {
    let value = record.get(name).ok_or_else(|| LatirError::MissingFeature {
        name: name.to_string(),
    })?;
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::Bool(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => {
            s.trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| LatirError::InvalidFeature {
                    name: name.to_string(),
                    reason: format!("{s:?} is not numeric"),
                })
        }
        other => Err(LatirError::InvalidFeature {
            name: name.to_string(),
            reason: format!("unsupported JSON value {other}"),
        }),
    }
}

/// Extract a categorical cell from a JSON record as a category key
fn categorical_cell(
    record: &serde_json::Map<String, Value>,
    name: &str,
) -> Result<Option<String>> {
    let value = record.get(name).ok_or_else(|| LatirError::MissingFeature {
        name: name.to_string(),
    })?;
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.trim().to_string())),
        Value::Number(n) => Ok(n.as_f64().map(number_key)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(LatirError::InvalidFeature {
            name: name.to_string(),
            reason: format!("unsupported JSON value {other}"),
        }),
    }
}
