//! Error types for latir
//!
//! One crate-wide error enum covering the taxonomy the service deals in:
//! I/O, dataset schema, model fitting, artifact persistence, and inference
//! lookup failures.

use thiserror::Error;

/// Error type for all latir operations
#[derive(Debug, Error)]
pub enum LatirError {
    /// Filesystem error reading a dataset or artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited dataset file
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A declared column is absent from the dataset header
    #[error("Missing column in dataset: {column}")]
    MissingColumn {
        /// Column name from the feature schema
        column: String,
    },

    /// A cell could not be parsed as the declared column type
    #[error("Invalid value {value:?} for numeric column {column} at row {row}")]
    InvalidValue {
        /// Column name
        column: String,
        /// Raw cell contents
        value: String,
        /// Zero-based data row index
        row: usize,
    },

    /// Label column contains a value outside {0, 1}
    #[error("Label value {value:?} at row {row} is outside the binary domain {{0, 1}}")]
    LabelDomain {
        /// Raw label cell contents
        value: String,
        /// Zero-based data row index
        row: usize,
    },

    /// Too few rows to carve out a holdout split
    #[error("Dataset must contain at least 2 rows to split, got {rows}")]
    DatasetTooSmall {
        /// Number of rows read
        rows: usize,
    },

    /// Holdout fraction outside (0, 1)
    #[error("test_size must be in (0, 1), got {test_size}")]
    InvalidSplit {
        /// Requested holdout fraction
        test_size: f64,
    },

    /// Model fitting or prediction failed inside smartcore
    #[error("Model error: {0}")]
    Model(#[from] smartcore::error::Failed),

    /// Pipeline artifact could not be serialized or deserialized
    #[error("Artifact error: {0}")]
    Artifact(#[from] bincode::Error),

    /// Metrics record could not be serialized
    #[error("Metrics error: {0}")]
    Metrics(#[from] serde_json::Error),

    /// An inference record is missing a feature key entirely
    #[error("Record is missing feature {name:?}")]
    MissingFeature {
        /// Feature name from the trained schema
        name: String,
    },

    /// An inference record carries a value the transformer cannot use
    #[error("Feature {name:?} has unusable value: {reason}")]
    InvalidFeature {
        /// Feature name from the trained schema
        name: String,
        /// What made the value unusable
        reason: String,
    },

    /// Classifier produced a class id with no diagnosis label
    #[error("Unknown class {class} has no diagnosis label")]
    UnknownClass {
        /// Class id as emitted by the classifier
        class: i32,
    },
}

/// Result type for latir operations
pub type Result<T> = std::result::Result<T, LatirError>;
