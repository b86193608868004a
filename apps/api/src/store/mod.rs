//! Persistence adapter for analysis records and per-user ATS counters.
//!
//! The engine talks to `AnalysisStore` only. Sequence columns are encoded
//! and decoded inside the adapters (`codec`); callers always see `Vec<String>`.
//! Ownership is not checked here; see `crate::ats::authz`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::analysis::{AnalysisRecord, NewAnalysis, SharedAnalysis};
use crate::models::user::UserStat;

pub mod codec;
#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("share token already exists")]
    DuplicateShareToken,

    #[error("owner does not exist")]
    UnknownOwner,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Inserts the record and applies it to the owner's counters as one unit:
    /// total + 1, last = score, best = max(best, score).
    async fn insert_with_stats(&self, new: NewAnalysis) -> Result<AnalysisRecord, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AnalysisRecord>, StoreError>;

    /// Looks up by token regardless of visibility, with the owner's display name.
    async fn find_by_token(&self, token: &str) -> Result<Option<SharedAnalysis>, StoreError>;

    /// Newest first. `limit = None` returns the full history.
    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<AnalysisRecord>, StoreError>;

    /// Returns false when no such record exists.
    async fn set_visibility(&self, id: Uuid, is_public: bool) -> Result<bool, StoreError>;

    /// Deletes the record and decrements its owner's total (floored at 0) as
    /// one unit. Returns false when no such record exists.
    async fn delete_with_stats(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn user_stats(&self, owner_id: Uuid) -> Result<Option<UserStat>, StoreError>;
}
