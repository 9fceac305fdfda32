//! HTTP API for heart-disease inference
//!
//! Serves the persisted pipeline over three routes using axum.
//!
//! ## Endpoints
//!
//! - `GET /` - Greeting (plain text)
//! - `GET /health` - Health check
//! - `POST /predict` - Single-record diagnosis
//!
//! Error policy: any failure on `/predict` (absent or malformed JSON body,
//! missing feature key, model error, out-of-domain class) maps to a 500
//! with a plain-text message embedding the error, matching the service's
//! single blanket recovery mechanism. No 4xx differentiation is surfaced.
//!
//! ## Example
//!
//! ```rust,ignore
//! use latir::api::{create_router, AppState};
//!
//! let state = AppState::load(Path::new("data/pipeline.bin"))?;
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::error::{LatirError, Result};
use crate::pipeline::Pipeline;

mod types;

pub use types::{diagnosis_label, PredictRequest, PredictResponse};

/// Application state shared across handlers
///
/// Holds the pipeline loaded once at startup; read-only for the process
/// lifetime, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
}

impl AppState {
    /// Wrap an already-fitted pipeline
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Load the persisted pipeline artifact once
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(Pipeline::load(path)?))
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .with_state(state)
}

/// Greeting handler
async fn index_handler() -> &'static str {
    "Hello, world!"
}

/// Health check handler
async fn health_handler() -> &'static str {
    "OK"
}

/// Single-record prediction handler
///
/// The body is captured as a `Result` so a missing or malformed JSON payload
/// flows through the same 500 path as every other failure instead of axum's
/// default 4xx rejection.
async fn predict_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> std::result::Result<Json<PredictResponse>, (StatusCode, String)> {
    let start = Instant::now();

    let Json(record) = payload.map_err(internal_error)?;

    let class = state
        .pipeline
        .predict_record(&record)
        .map_err(internal_error)?;

    let label = diagnosis_label(class)
        .ok_or(LatirError::UnknownClass { class })
        .map_err(internal_error)?;

    tracing::debug!(
        class,
        diagnosis = label,
        latency_ms = start.elapsed().as_secs_f64() * 1000.0,
        "prediction served"
    );

    Ok(Json(PredictResponse {
        diagnosis: label.to_string(),
    }))
}

/// Blanket error-to-500 mapping with the error's string form in the body
fn internal_error(err: impl std::fmt::Display) -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Oops, got an error! {err}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::util::ServiceExt;

    use crate::dataset::Dataset;
    use crate::schema::FeatureSchema;

    fn test_state() -> AppState {
        let schema = FeatureSchema {
            numeric: vec!["age".to_string()],
            categorical: vec!["sex".to_string()],
            label: "target".to_string(),
        };
        let ages = [30.0, 35.0, 32.0, 38.0, 61.0, 64.0, 67.0, 70.0];
        let sexes = ["0", "0", "1", "0", "1", "1", "1", "1"];
        let dataset = Dataset {
            numeric: vec![ages.iter().map(|&a| Some(a)).collect()],
            categorical: vec![sexes.iter().map(|s| Some(s.to_string())).collect()],
            labels: vec![0, 0, 0, 0, 1, 1, 1, 1],
        };
        AppState::new(Pipeline::fit(schema, &dataset).expect("fit"))
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    fn predict_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn test_index_returns_greeting() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "Hello, world!");
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
    }

    #[tokio::test]
    async fn test_predict_full_record() {
        let app = create_router(test_state());
        let body = json!({"age": 66, "sex": 1}).to_string();
        let response = app.oneshot(predict_request(&body)).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let parsed: serde_json::Value =
            serde_json::from_str(&body_string(response).await).expect("json");
        let object = parsed.as_object().expect("object");
        assert_eq!(object.len(), 1);
        let diagnosis = object["diagnosis"].as_str().expect("string");
        assert!(diagnosis == "clear" || diagnosis == "heart-disease");
    }

    #[tokio::test]
    async fn test_predict_is_idempotent() {
        let state = test_state();
        let body = json!({"age": 34, "sex": "0"}).to_string();

        let first = create_router(state.clone())
            .oneshot(predict_request(&body))
            .await
            .expect("response");
        let second = create_router(state)
            .oneshot(predict_request(&body))
            .await
            .expect("response");

        assert_eq!(body_string(first).await, body_string(second).await);
    }

    #[tokio::test]
    async fn test_predict_missing_feature_is_500() {
        let app = create_router(test_state());
        let body = json!({"age": 66}).to_string();
        let response = app.oneshot(predict_request(&body)).await.expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let text = body_string(response).await;
        assert!(text.starts_with("Oops, got an error!"));
        assert!(text.contains("sex"));
    }

    #[tokio::test]
    async fn test_predict_empty_body_is_500() {
        let app = create_router(test_state());
        let response = app.oneshot(predict_request("")).await.expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(response).await.starts_with("Oops, got an error!"));
    }

    #[tokio::test]
    async fn test_predict_non_object_body_is_500() {
        let app = create_router(test_state());
        let response = app
            .oneshot(predict_request("[1, 2, 3]"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_predict_without_content_type_is_500() {
        let app = create_router(test_state());
        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .body(Body::from(json!({"age": 66, "sex": 1}).to_string()))
            .expect("request");
        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nope")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_predict_null_cell_is_imputed() {
        let app = create_router(test_state());
        let body = json!({"age": null, "sex": "1"}).to_string();
        let response = app.oneshot(predict_request(&body)).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
