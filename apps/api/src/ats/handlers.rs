//! Axum route handlers for the ATS API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ats::analytics::AggregateStats;
use crate::ats::extraction::extract_text;
use crate::ats::insights::InsightFeed;
use crate::ats::scoring::DocumentMeta;
use crate::ats::service::RecordedAnalysis;
use crate::auth::Principal;
use crate::errors::AppError;
use crate::models::analysis::{AnalysisRecord, PublicAnalysis, ScoredResult};
use crate::models::user::UserStat;
use crate::state::AppState;

/// Multipart field names accepted for the resume file.
const FILE_FIELDS: &[&str] = &["file", "resume"];

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    /// Extracted text; absent or blank means extraction failed upstream.
    pub text: Option<String>,
    pub file_name: String,
    pub file_size: u64,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub recorded: RecordedAnalysis,
    pub result: ScoredResult,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub is_public: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalysisListResponse {
    pub analyses: Vec<AnalysisRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ats/score
///
/// Scores already-extracted text (or metadata only) without persisting anything.
pub async fn handle_score(
    State(state): State<AppState>,
    _principal: Principal,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoredResult>, AppError> {
    if request.file_name.trim().is_empty() {
        return Err(AppError::Validation("file_name cannot be empty".to_string()));
    }
    let meta = DocumentMeta {
        file_name: request.file_name,
        byte_size: request.file_size,
    };
    Ok(Json(state.ats.score(request.text.as_deref(), &meta).await))
}

/// POST /api/v1/ats/analyses
///
/// Multipart upload: extract text → score → record. Extraction failure still
/// yields a metadata-based score.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Principal(owner_id): Principal,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let (file_name, data) = read_upload(&mut multipart).await?;

    let meta = DocumentMeta {
        file_name: file_name.clone(),
        byte_size: data.len() as u64,
    };
    let text = extract_text(data, &file_name).await;
    let result = state.ats.score(text.as_deref(), &meta).await;
    let recorded = state.ats.record(owner_id, &file_name, result.clone()).await?;

    Ok(Json(AnalyzeResponse { recorded, result }))
}

/// GET /api/v1/ats/analyses
pub async fn handle_list(
    State(state): State<AppState>,
    Principal(owner_id): Principal,
) -> Result<Json<AnalysisListResponse>, AppError> {
    let analyses = state.ats.list(owner_id).await?;
    Ok(Json(AnalysisListResponse { analyses }))
}

/// GET /api/v1/ats/analyses/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Principal(owner_id): Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisRecord>, AppError> {
    Ok(Json(state.ats.get(id, owner_id).await?))
}

/// PATCH /api/v1/ats/analyses/:id/visibility
pub async fn handle_set_visibility(
    State(state): State<AppState>,
    Principal(owner_id): Principal,
    Path(id): Path<Uuid>,
    Json(request): Json<VisibilityRequest>,
) -> Result<StatusCode, AppError> {
    state
        .ats
        .set_visibility(id, owner_id, request.is_public)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/ats/analyses/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Principal(owner_id): Principal,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.ats.delete(id, owner_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/ats/analytics
pub async fn handle_analytics(
    State(state): State<AppState>,
    Principal(owner_id): Principal,
) -> Result<Json<AggregateStats>, AppError> {
    Ok(Json(state.ats.analytics(owner_id).await?))
}

/// GET /api/v1/ats/insights
pub async fn handle_insights(
    State(state): State<AppState>,
    Principal(owner_id): Principal,
) -> Result<Json<InsightFeed>, AppError> {
    Ok(Json(state.ats.insights(owner_id).await?))
}

/// GET /api/v1/ats/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    Principal(owner_id): Principal,
) -> Result<Json<UserStat>, AppError> {
    Ok(Json(state.ats.stats(owner_id).await?))
}

/// GET /api/v1/public/ats/:token
///
/// No principal required; only records the owner made public resolve.
pub async fn handle_get_public(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<PublicAnalysis>, AppError> {
    Ok(Json(state.ats.get_public(&token).await?))
}

async fn read_upload(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if !field.name().is_some_and(|n| FILE_FIELDS.contains(&n)) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "resume".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        return Ok((file_name, data));
    }
    Err(AppError::Validation(
        "Missing resume file (multipart field 'file')".to_string(),
    ))
}
