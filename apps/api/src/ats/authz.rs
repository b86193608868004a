//! Authorization checks, kept separate from data access.
//!
//! Handlers fetch by key first, then pass the result through these checks.
//! A record owned by someone else is reported exactly like a missing one.

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{AnalysisRecord, SharedAnalysis};

pub fn authorize_owner(
    record: Option<AnalysisRecord>,
    analysis_id: Uuid,
    principal: Uuid,
) -> Result<AnalysisRecord, AppError> {
    match record {
        Some(record) if record.owner_id == principal => Ok(record),
        _ => Err(analysis_not_found(analysis_id)),
    }
}

/// Public lookups only succeed while the owner keeps the record public.
pub fn authorize_public(shared: Option<SharedAnalysis>) -> Result<SharedAnalysis, AppError> {
    match shared {
        Some(shared) if shared.record.is_public => Ok(shared),
        _ => Err(shared_not_found()),
    }
}

pub fn analysis_not_found(analysis_id: Uuid) -> AppError {
    AppError::NotFound(format!("Analysis {analysis_id} not found"))
}

pub fn shared_not_found() -> AppError {
    AppError::NotFound("Shared analysis not found".to_string())
}
