//! # Latir
//!
//! Pure Rust heart-disease risk service: an offline tabular training
//! pipeline and a synchronous HTTP inference surface, loosely coupled
//! through one persisted artifact.
//!
//! ## Components
//!
//! - **Training**: reads a labeled CSV, carves a seeded holdout split, fits
//!   a preprocessing + logistic-regression pipeline, reports accuracy and
//!   ROC-AUC, and persists the pipeline plus a metrics record.
//! - **Serving**: loads the artifact once at startup and answers
//!   single-record `POST /predict` requests with a diagnosis label.
//!
//! Training and serving never run in the same process; the loaded pipeline
//! is immutable shared state, so concurrent requests need no locking.
//!
//! ## Example
//!
//! ```rust,ignore
//! use latir::schema::FeatureSchema;
//! use latir::train::{train, TrainOptions};
//!
//! let schema = FeatureSchema::default();
//! let report = train(Path::new("heart.csv"), &schema, &TrainOptions::default())?;
//! println!("validation accuracy: {:.2}%", report.metrics.val_acc);
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)] // row counts -> f64 for metrics is safe
#![allow(clippy::cast_possible_truncation)] // split sizes are bounded by row count
#![allow(clippy::cast_sign_loss)] // ceil of a positive fraction
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::float_cmp)] // exact label-domain checks are intentional
#![allow(clippy::manual_range_contains)]

/// HTTP API: router, state, and handlers
pub mod api;
/// Delimited dataset loading and validation
pub mod dataset;
/// Crate-wide error type
pub mod error;
/// Training run metrics record
pub mod metrics;
/// Persisted preprocessing + classification pipeline
pub mod pipeline;
/// Column-wise preprocessing transform
pub mod preprocess;
/// Feature and label column schema
pub mod schema;
/// Training entry point
pub mod train;

pub use error::{LatirError, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
