use axum::{
    extract::{DefaultBodyLimit, Query, State},
    response::{IntoResponse, Response},
    routing::post,
    Router,
    Json,
    http::Method,
};
use bytes::Bytes;
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    models::{AnalyzeRequest, UploadQuery},
    services::loader::{load_file_from_url, FileFormat},
};
use tower_http::cors::{CorsLayer, Any};

pub fn routes(max_file_size: usize) -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/eda/upload", post(upload_file))
        .route("/eda/analyze", post(analyze_url))
        .layer(DefaultBodyLimit::max(max_file_size))
        .layer(cors)
}

/// Analyses a file sent as the raw request body.
async fn upload_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Response, AppError> {
    tracing::info!("Received upload {} ({}KB)", query.file_name, body.len() / 1024);
    if body.is_empty() {
        return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
    }

    let report = state.reports.analyze(query.file_name, body).await?;
    Ok(Json(report.as_ref()).into_response())
}

/// Downloads a file from a signed URL, then analyses it.
async fn analyze_url(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Response, AppError> {
    let start = std::time::Instant::now();

    // Reject unsupported types before downloading anything
    FileFormat::from_file_name(&request.file_name)?;

    tracing::info!(
        "Downloading {} from URL (length {})",
        request.file_name,
        request.signed_url.len()
    );
    let file_data = load_file_from_url(&request.signed_url).await?;
    if file_data.len() > state.config.max_file_size {
        return Err(AppError::InvalidInput(format!(
            "File is {} bytes, limit is {}",
            file_data.len(),
            state.config.max_file_size
        )));
    }
    tracing::info!("File downloaded, size: {}KB, took: {:?}", file_data.len() / 1024, start.elapsed());

    let report = state.reports.analyze(request.file_name, file_data).await?;
    tracing::info!("Total processing completed in {:?}", start.elapsed());
    Ok(Json(report.as_ref()).into_response())
}
