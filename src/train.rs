//! Training entry point
//!
//! Reads a labeled CSV, carves out a seeded holdout split, fits the
//! preprocessing + classification pipeline on the train split, and reports
//! accuracy on both splits plus validation ROC-AUC. With `dump` enabled the
//! fitted pipeline and a metrics record are persisted to the data directory,
//! overwriting any previous run.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use smartcore::metrics::{accuracy, roc_auc_score};

use crate::dataset::{Dataset, ReadOptions};
use crate::error::{LatirError, Result};
use crate::metrics::{format_timestamp, TrainingMetrics};
use crate::pipeline::Pipeline;
use crate::schema::FeatureSchema;

/// Default data directory for persisted artifacts
pub const DEFAULT_DATA_DIR: &str = "data";
/// Pipeline artifact file name
pub const PIPELINE_FILE: &str = "pipeline.bin";
/// Metrics record file name
pub const METRICS_FILE: &str = "metrics.json";

/// Filesystem locations for the persisted artifacts
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    /// Directory holding both artifacts
    pub data_dir: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl ArtifactPaths {
    /// Paths rooted at a caller-chosen data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Location of the serialized pipeline
    pub fn pipeline(&self) -> PathBuf {
        self.data_dir.join(PIPELINE_FILE)
    }

    /// Location of the metrics record
    pub fn metrics(&self) -> PathBuf {
        self.data_dir.join(METRICS_FILE)
    }
}

/// Knobs for one training run
///
/// The split seed is an explicit field rather than process-global RNG state:
/// runs with the same seed and input produce the same split and metrics.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Holdout fraction in (0, 1)
    pub test_size: f64,
    /// Persist the pipeline and metrics after fitting
    pub dump: bool,
    /// Seed for the holdout shuffle
    pub seed: u64,
    /// CSV parse options
    pub read: ReadOptions,
    /// Artifact locations used when `dump` is set
    pub paths: ArtifactPaths,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            dump: true,
            seed: 42,
            read: ReadOptions::default(),
            paths: ArtifactPaths::default(),
        }
    }
}

/// Outcome of a training run: the fitted pipeline plus its metrics
#[derive(Debug)]
pub struct TrainReport {
    /// Fitted pipeline (also persisted when `dump` was set)
    pub pipeline: Pipeline,
    /// Metrics record (also persisted when `dump` was set)
    pub metrics: TrainingMetrics,
}

/// Train the pipeline on a labeled CSV
///
/// Prints a two-decimal summary of the three metrics and, when
/// `options.dump` is set, writes the pipeline artifact and metrics record.
/// First failure aborts the run; a crash mid-write can leave a truncated
/// artifact (no atomic replace).
pub fn train(path: &Path, schema: &FeatureSchema, options: &TrainOptions) -> Result<TrainReport> {
    if !(options.test_size > 0.0 && options.test_size < 1.0) {
        return Err(LatirError::InvalidSplit {
            test_size: options.test_size,
        });
    }

    let start = Instant::now();

    let dataset = Dataset::from_csv(path, schema, &options.read)?;
    let (train_ds, val_ds) = holdout_split(&dataset, options.test_size, options.seed)?;

    let pipeline = Pipeline::fit(schema.clone(), &train_ds)?;
    let elapsed = start.elapsed().as_secs_f64();

    let train_pred = pipeline.predict(&train_ds)?;
    let val_pred = pipeline.predict(&val_ds)?;

    let acc = accuracy(&train_ds.labels, &train_pred) * 100.0;
    let val_acc = accuracy(&val_ds.labels, &val_pred) * 100.0;

    let val_truth: Vec<f64> = val_ds.labels.iter().map(|&l| f64::from(l)).collect();
    let val_probs = pipeline.predict_proba(&val_ds);
    let roc_auc = roc_auc_score(&val_truth, &val_probs);

    println!("Training accuracy: {acc:.2}%");
    println!("Validation accuracy: {val_acc:.2}%");
    println!("ROC AUC score: {roc_auc:.2}");

    let metrics = TrainingMetrics {
        elapsed,
        acc,
        val_acc,
        roc_auc,
        timestamp: format_timestamp(),
    };

    if options.dump {
        std::fs::create_dir_all(&options.paths.data_dir)?;
        pipeline.save(&options.paths.pipeline())?;
        metrics.dump(&options.paths.metrics())?;
    }

    Ok(TrainReport { pipeline, metrics })
}

/// Seeded random holdout split over raw rows
///
/// The transformer must be fit on raw (pre-encoding) train columns, so the
/// split happens on row indices before any matrix conversion.
fn holdout_split(dataset: &Dataset, test_size: f64, seed: u64) -> Result<(Dataset, Dataset)> {
    let n = dataset.len();
    if n < 2 {
        return Err(LatirError::DatasetTooSmall { rows: n });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_val = (((n as f64) * test_size).ceil() as usize).clamp(1, n - 1);
    let (val_idx, train_idx) = indices.split_at(n_val);
    Ok((dataset.select(train_idx), dataset.select(val_idx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tiny_schema() -> FeatureSchema {
        FeatureSchema {
            numeric: vec!["age".to_string(), "thalach".to_string()],
            categorical: vec!["sex".to_string()],
            label: "target".to_string(),
        }
    }

    /// Separable 40-row CSV: positives are old with low max heart rate.
    fn write_dataset() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "age,thalach,sex,target").expect("header");
        for i in 0..20 {
            writeln!(file, "{},{},{},0", 30 + i, 170 + i, i % 2).expect("row");
            writeln!(file, "{},{},{},1", 60 + i, 110 + i, i % 2).expect("row");
        }
        file
    }

    fn no_dump_options() -> TrainOptions {
        TrainOptions {
            dump: false,
            ..TrainOptions::default()
        }
    }

    #[test]
    fn test_train_metrics_ranges() {
        let file = write_dataset();
        let report = train(file.path(), &tiny_schema(), &no_dump_options()).expect("train");
        assert!((0.0..=100.0).contains(&report.metrics.acc));
        assert!((0.0..=100.0).contains(&report.metrics.val_acc));
        assert!((0.0..=1.0).contains(&report.metrics.roc_auc));
        assert!(report.metrics.elapsed >= 0.0);
        // separable data should classify near perfectly
        assert!(report.metrics.acc > 90.0);
    }

    #[test]
    fn test_train_same_seed_same_split() {
        let file = write_dataset();
        let a = train(file.path(), &tiny_schema(), &no_dump_options()).expect("train");
        let b = train(file.path(), &tiny_schema(), &no_dump_options()).expect("train");
        assert_eq!(a.metrics.acc, b.metrics.acc);
        assert_eq!(a.metrics.val_acc, b.metrics.val_acc);
        assert_eq!(a.metrics.roc_auc, b.metrics.roc_auc);
    }

    #[test]
    fn test_train_dump_writes_artifacts() {
        let file = write_dataset();
        let dir = tempfile::tempdir().expect("tempdir");
        let options = TrainOptions {
            paths: ArtifactPaths::new(dir.path()),
            ..TrainOptions::default()
        };
        train(file.path(), &tiny_schema(), &options).expect("train");
        assert!(options.paths.pipeline().exists());
        assert!(options.paths.metrics().exists());

        let metrics = TrainingMetrics::load(&options.paths.metrics()).expect("load metrics");
        assert!((0.0..=100.0).contains(&metrics.val_acc));
    }

    #[test]
    fn test_invalid_test_size_rejected() {
        let file = write_dataset();
        for test_size in [0.0, 1.0, -0.3, 2.0] {
            let options = TrainOptions {
                test_size,
                dump: false,
                ..TrainOptions::default()
            };
            let err = train(file.path(), &tiny_schema(), &options).expect_err("must fail");
            assert!(matches!(err, LatirError::InvalidSplit { .. }));
        }
    }

    #[test]
    fn test_unreadable_path_rejected() {
        let err = train(
            Path::new("/nonexistent/heart.csv"),
            &tiny_schema(),
            &no_dump_options(),
        )
        .expect_err("must fail");
        assert!(matches!(err, LatirError::Csv(_) | LatirError::Io(_)));
    }

    #[test]
    fn test_single_row_dataset_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "age,thalach,sex,target").expect("header");
        writeln!(file, "63,150,1,1").expect("row");
        let err = train(file.path(), &tiny_schema(), &no_dump_options()).expect_err("must fail");
        assert!(matches!(err, LatirError::DatasetTooSmall { rows: 1 }));
    }

    #[test]
    fn test_holdout_split_sizes() {
        let file = write_dataset();
        let ds = Dataset::from_csv(file.path(), &tiny_schema(), &ReadOptions::default())
            .expect("load");
        let (train_ds, val_ds) = holdout_split(&ds, 0.2, 7).expect("split");
        assert_eq!(val_ds.len(), 8);
        assert_eq!(train_ds.len(), 32);
    }
}
