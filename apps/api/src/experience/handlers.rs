//! Axum route handlers for the Experience API.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::experience::duration::RoundingMode;
use crate::experience::models::{ResultRecords, ResumeDocument};
use crate::experience::pipeline::DocumentPipeline;
use crate::extraction::{capabilities, Capabilities};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractQuery {
    pub rounding: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub batch_id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub model_enabled: bool,
    pub results: ResultRecords,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub model_enabled: bool,
    pub model: Option<String>,
    pub max_retries: u32,
    pub formats: Capabilities,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/experience/extract
///
/// Accepts one or more resume files as multipart parts and returns the total
/// years of experience per file, in upload order. A file that cannot be read
/// gets an error entry; the rest of the batch still runs.
pub async fn handle_extract(
    State(state): State<AppState>,
    Query(query): Query<ExtractQuery>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let rounding = match query.rounding.as_deref() {
        Some(raw) => raw.parse::<RoundingMode>().map_err(AppError::Validation)?,
        None => RoundingMode::default(),
    };

    let documents = collect_documents(&mut multipart).await?;
    if documents.is_empty() {
        return Err(AppError::Validation(
            "Upload at least one .pdf, .docx or .txt file".to_string(),
        ));
    }

    let batch_id = Uuid::new_v4();
    info!("Batch {batch_id}: {} resume(s) received", documents.len());

    let pipeline = DocumentPipeline::new(state.estimator.clone(), rounding)
        .with_staging_dir(state.config.staging_dir.clone());
    let results = pipeline.process_batch(documents).await;

    let failed = results.iter().filter(|(_, r)| r.is_failure()).count();
    info!(
        "Batch {batch_id}: {} processed, {} failed",
        results.len(),
        failed
    );

    Ok(Json(ExtractResponse {
        batch_id,
        computed_at: Utc::now(),
        model_enabled: state.estimator.model_enabled(),
        results,
    }))
}

/// GET /api/v1/experience/status
///
/// Tells the caller whether model extraction is enabled or the heuristic will be used.
pub async fn handle_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        model_enabled: state.estimator.model_enabled(),
        model: state.estimator.model().map(str::to_string),
        max_retries: state.estimator.max_retries(),
        formats: capabilities(),
    })
}

async fn collect_documents(multipart: &mut Multipart) -> Result<Vec<ResumeDocument>, AppError> {
    let mut documents = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(filename) = field.file_name().filter(|n| !n.is_empty()).map(str::to_string)
        else {
            warn!(
                "Skipping multipart field '{}' without a filename",
                field.name().unwrap_or_default()
            );
            continue;
        };
        let content = field.bytes().await?;
        documents.push(ResumeDocument { filename, content });
    }
    Ok(documents)
}
