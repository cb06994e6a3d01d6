//! REST API module using Axum
//!
//! Two endpoints: `GET /` as a liveness probe and `POST /predict` for
//! single-patient inference against the loaded model artifact.

pub mod handlers;

pub use handlers::{PredictRequest, ServiceError, ServiceState};

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build a CORS layer for the configured frontend origins.
///
/// Origins that fail to parse as header values are skipped; an empty list
/// yields a same-origin-only layer.
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<_> = origins
        .iter()
        .filter_map(|o| o.trim().parse().ok())
        .collect();
    if !allowed.is_empty() {
        tracing::info!(origins = origins.join(","), "CORS: allowing configured origins");
    }
    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Create the application router.
pub fn create_app(state: ServiceState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/predict", post(handlers::predict))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
