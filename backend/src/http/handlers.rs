//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to
//! [`crate::services::ParcelAnalysisService`], which moves model fitting and
//! prediction onto the blocking pool.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};

use super::dto::{
    CitiesResponse, CreateReportRequest, DocumentDeleteResponse, DocumentListQuery,
    DocumentListResponse, DocumentUploadResponse, HealthResponse, PredictRequest,
    ReportResponse, TrainingSamplesRequest, TrainingSamplesResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::{DocumentsOverview, ZonePrediction};
use crate::services::TrainingReport;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.service.repository().as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
        model_version: state.service.model_version(),
        model_trained: state.service.is_trained(),
    }))
}

// =============================================================================
// Documents
// =============================================================================

/// POST /v1/documents
///
/// Multipart upload with a `file` part and an optional `city` text part.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> HandlerResult<DocumentUploadResponse> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut city: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
                file = Some((filename, bytes.to_vec()));
            }
            "city" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid city field: {}", e)))?;
                city = Some(text);
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| AppError::BadRequest("Missing 'file' part".to_string()))?;
    if filename.is_empty() {
        return Err(AppError::BadRequest("Uploaded file has no name".to_string()));
    }

    let document = state
        .service
        .ingest_document(&filename, &bytes, city.as_deref())
        .await?;

    Ok(Json(DocumentUploadResponse {
        message: format!(
            "Processed {} for {}: {} rules extracted",
            document.filename,
            document.city,
            document.rules_count()
        ),
        document: document.summary(),
        text_length: document.text_length,
        rules: document.rules,
    }))
}

/// GET /v1/documents?city=
pub async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<DocumentListQuery>,
) -> HandlerResult<DocumentListResponse> {
    let documents =
        db_services::list_documents(state.service.repository().as_ref(), query.city.as_deref())
            .await?;
    let total = documents.len();
    Ok(Json(DocumentListResponse { documents, total }))
}

/// DELETE /v1/documents/{id}
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<DocumentDeleteResponse> {
    let document = db_services::delete_document(state.service.repository().as_ref(), &id).await?;
    Ok(Json(DocumentDeleteResponse {
        message: format!("Deleted document {}", document.id),
        document,
    }))
}

/// GET /v1/documents/summary
pub async fn documents_summary(State(state): State<AppState>) -> HandlerResult<DocumentsOverview> {
    let overview = db_services::documents_overview(state.service.repository().as_ref()).await?;
    Ok(Json(overview))
}

/// GET /v1/cities
pub async fn list_cities(State(state): State<AppState>) -> HandlerResult<CitiesResponse> {
    let cities = db_services::city_statistics(state.service.repository().as_ref()).await?;
    Ok(Json(CitiesResponse { cities }))
}

// =============================================================================
// Model
// =============================================================================

/// POST /v1/training-samples
pub async fn add_training_samples(
    State(state): State<AppState>,
    Json(request): Json<TrainingSamplesRequest>,
) -> HandlerResult<TrainingSamplesResponse> {
    let added = request.parcels.len();
    let total_samples = state.service.add_labelled_parcels(request.parcels).await?;
    Ok(Json(TrainingSamplesResponse {
        added,
        total_samples,
    }))
}

/// POST /v1/model/train
pub async fn train_model(State(state): State<AppState>) -> HandlerResult<TrainingReport> {
    let report = state.service.train().await?;
    Ok(Json(report))
}

/// POST /v1/zoning/predict
pub async fn predict_zoning(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> HandlerResult<ZonePrediction> {
    let prediction = state
        .service
        .predict_for_city(
            request.city.as_deref(),
            &request.polygon,
            &request.nearby_areas,
        )
        .await?;
    Ok(Json(prediction))
}

// =============================================================================
// Reports
// =============================================================================

/// POST /v1/reports
pub async fn create_report(
    State(state): State<AppState>,
    Json(request): Json<CreateReportRequest>,
) -> HandlerResult<ReportResponse> {
    let report = state.service.generate_report(request.into()).await?;
    Ok(Json(report.into()))
}
