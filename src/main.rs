//! Latir CLI - heart-disease training and inference service
//!
//! # Commands
//!
//! - `train` - Fit the pipeline on a labeled CSV and persist the artifacts
//! - `serve` - Start the inference server against a persisted pipeline
//! - `info` - Show version info

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use latir::{
    api::{create_router, AppState},
    dataset::ReadOptions,
    error::Result,
    schema::FeatureSchema,
    train::{train, ArtifactPaths, TrainOptions},
};

/// Latir - heart-disease risk service
///
/// Trains a tabular preprocessing + logistic-regression pipeline offline and
/// serves single-record predictions over HTTP.
#[derive(Parser)]
#[command(name = "latir")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the pipeline on a labeled dataset
    ///
    /// Examples:
    ///   latir train heart.csv
    ///   latir train heart.csv --test-size 0.3 --seed 7
    ///   latir train export.csv --delimiter ";" --label outcome --no-dump
    Train {
        /// Path to the delimited dataset file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Holdout fraction in (0, 1)
        #[arg(long, default_value = "0.2")]
        test_size: f64,

        /// Skip persisting the pipeline and metrics
        #[arg(long)]
        no_dump: bool,

        /// Seed for the holdout shuffle
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Comma-separated numeric feature columns (defaults to the heart schema)
        #[arg(long)]
        numeric: Option<String>,

        /// Comma-separated categorical feature columns (defaults to the heart schema)
        #[arg(long)]
        categorical: Option<String>,

        /// Label column name
        #[arg(long)]
        label: Option<String>,

        /// Field delimiter (single character)
        #[arg(long, default_value = ",", value_parser = parse_delimiter)]
        delimiter: u8,

        /// Directory for the persisted artifacts
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Start the inference server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Path to the persisted pipeline artifact
        #[arg(short, long, default_value = "data/pipeline.bin")]
        model: PathBuf,
    },
    /// Show version info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            path,
            test_size,
            no_dump,
            seed,
            numeric,
            categorical,
            label,
            delimiter,
            data_dir,
        } => {
            let schema = FeatureSchema::with_overrides(
                numeric.as_deref().map(parse_columns),
                categorical.as_deref().map(parse_columns),
                label,
            );
            let options = TrainOptions {
                test_size,
                dump: !no_dump,
                seed,
                read: ReadOptions { delimiter },
                paths: ArtifactPaths::new(data_dir),
            };
            let report = train(&path, &schema, &options)?;
            if options.dump {
                println!();
                println!("Pipeline written to {}", options.paths.pipeline().display());
                println!("Metrics written to {}", options.paths.metrics().display());
            }
            tracing::info!(
                elapsed = report.metrics.elapsed,
                val_acc = report.metrics.val_acc,
                "training run complete"
            );
        }
        Commands::Serve { host, port, model } => {
            serve(&host, port, &model).await?;
        }
        Commands::Info => {
            println!("Latir v{}", latir::VERSION);
            println!("Heart-disease risk service");
            println!();
            println!("Features:");
            println!("  - CSV training with median/constant imputation and one-hot encoding");
            println!("  - Binary logistic classifier with accuracy and ROC-AUC reporting");
            println!("  - Persisted pipeline artifact + JSON metrics record");
            println!("  - REST API for single-record inference");
        }
    }

    Ok(())
}

/// Split a comma-separated column list
fn parse_columns(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Delimiter argument parser: exactly one byte, rejected by clap otherwise
fn parse_delimiter(delimiter: &str) -> std::result::Result<u8, String> {
    match delimiter.as_bytes() {
        [b] => Ok(*b),
        _ => Err(format!(
            "must be a single character, got {delimiter:?}"
        )),
    }
}

async fn serve(host: &str, port: u16, model: &std::path::Path) -> Result<()> {
    println!("Loading pipeline from: {}", model.display());
    let state = AppState::load(model)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{host}:{port}").parse().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Invalid address: {e}"),
        )
    })?;

    println!("Server listening on http://{addr}");
    println!();
    println!("Endpoints:");
    println!("  GET  /         - Greeting");
    println!("  GET  /health   - Health check");
    println!("  POST /predict  - Single-record diagnosis");
    println!();
    println!("Example:");
    println!("  curl http://{addr}/health");
    println!();

    tracing::info!(%addr, "inference server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
