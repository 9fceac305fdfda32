//! Feature schema for the heart-disease dataset
//!
//! Column names follow the UCI heart-disease export: 7 numeric features,
//! 6 categorical features, and a binary `target` label. Callers may override
//! any of the three lists, e.g. to retrain on a differently-labeled export.

use serde::{Deserialize, Serialize};

/// Default numeric feature columns
pub const NUMERIC_FEATURES: [&str; 7] = [
    "age", "trestbps", "chol", "fbs", "thalach", "exang", "oldpeak",
];

/// Default categorical feature columns
pub const CATEGORICAL_FEATURES: [&str; 6] = ["sex", "cp", "restecg", "ca", "slope", "thal"];

/// Default label column
pub const LABEL: &str = "target";

/// Named columns the pipeline trains on and predicts from
///
/// The schema is persisted inside the pipeline artifact so the serving side
/// aligns inference records against exactly the columns the model saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Columns imputed with the median and standardized
    pub numeric: Vec<String>,
    /// Columns imputed with a constant and one-hot encoded
    pub categorical: Vec<String>,
    /// Binary label column, values in {0, 1}
    pub label: String,
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self {
            numeric: NUMERIC_FEATURES.iter().map(ToString::to_string).collect(),
            categorical: CATEGORICAL_FEATURES
                .iter()
                .map(ToString::to_string)
                .collect(),
            label: LABEL.to_string(),
        }
    }
}

impl FeatureSchema {
    /// Build a schema with optional overrides, falling back to the defaults
    /// for any list left as `None`.
    pub fn with_overrides(
        numeric: Option<Vec<String>>,
        categorical: Option<Vec<String>>,
        label: Option<String>,
    ) -> Self {
        let default = Self::default();
        Self {
            numeric: numeric.unwrap_or(default.numeric),
            categorical: categorical.unwrap_or(default.categorical),
            label: label.unwrap_or(default.label),
        }
    }

    /// All feature columns, numeric first, in transformer output order
    pub fn feature_columns(&self) -> impl Iterator<Item = &str> {
        self.numeric
            .iter()
            .map(String::as_str)
            .chain(self.categorical.iter().map(String::as_str))
    }

    /// Number of feature columns (before one-hot expansion)
    pub fn num_features(&self) -> usize {
        self.numeric.len() + self.categorical.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_counts() {
        let schema = FeatureSchema::default();
        assert_eq!(schema.numeric.len(), 7);
        assert_eq!(schema.categorical.len(), 6);
        assert_eq!(schema.num_features(), 13);
        assert_eq!(schema.label, "target");
    }

    #[test]
    fn test_feature_columns_order() {
        let schema = FeatureSchema::default();
        let cols: Vec<&str> = schema.feature_columns().collect();
        assert_eq!(cols[0], "age");
        assert_eq!(cols[7], "sex");
        assert_eq!(cols.len(), 13);
    }

    #[test]
    fn test_overrides() {
        let schema = FeatureSchema::with_overrides(
            Some(vec!["x".to_string()]),
            None,
            Some("y".to_string()),
        );
        assert_eq!(schema.numeric, vec!["x"]);
        assert_eq!(schema.categorical.len(), 6);
        assert_eq!(schema.label, "y");
    }

    #[test]
    fn test_schema_serde_roundtrip() {
        let schema = FeatureSchema::default();
        let json = serde_json::to_string(&schema).expect("serialize");
        let back: FeatureSchema = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, schema);
    }
}
