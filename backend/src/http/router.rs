//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing) and
//! returns an axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Largest accepted upload.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive for map front-ends served from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Documents
        .route("/documents", post(handlers::upload_document))
        .route("/documents", get(handlers::list_documents))
        .route("/documents/summary", get(handlers::documents_summary))
        .route("/documents/{id}", delete(handlers::delete_document))
        .route("/cities", get(handlers::list_cities))
        // Model
        .route("/training-samples", post(handlers::add_training_samples))
        .route("/model/train", post(handlers::train_model))
        .route("/zoning/predict", post(handlers::predict_zoning))
        // Reports
        .route("/reports", post(handlers::create_report));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::db::LocalRepository;
    use crate::services::{ModelConfig, ParcelAnalysisService, ReportSettings};

    #[test]
    fn test_router_creation() {
        let service = ParcelAnalysisService::new(
            Arc::new(LocalRepository::new()),
            ModelConfig::default(),
            ReportSettings::default(),
        );
        let _router = create_router(AppState::new(service));
    }
}
