//! In-memory `AnalysisStore` for tests. One lock guards records and counters
//! together, which gives the same all-or-nothing behaviour as the SQL adapter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::analysis::{AnalysisRecord, NewAnalysis, SharedAnalysis};
use crate::models::user::UserStat;
use crate::store::{AnalysisStore, StoreError};

#[derive(Default)]
struct MemoryUser {
    display_name: Option<String>,
    stats: UserStat,
}

impl MemoryUser {
    fn record_score(&mut self, score: u8) {
        let score = i32::from(score);
        self.stats.total_resumes_analyzed += 1;
        self.stats.last_ats_score = score;
        self.stats.best_ats_score = self.stats.best_ats_score.max(score);
    }

    fn record_deletion(&mut self) {
        self.stats.total_resumes_analyzed = (self.stats.total_resumes_analyzed - 1).max(0);
    }
}

#[derive(Default)]
struct Inner {
    /// Creation order; newest last.
    records: Vec<AnalysisRecord>,
    users: HashMap<Uuid, MemoryUser>,
}

#[derive(Default)]
pub struct MemoryAnalysisStore {
    inner: RwLock<Inner>,
    forced_token_collisions: AtomicUsize,
}

impl MemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register_user(&self, id: Uuid, display_name: Option<&str>) {
        self.inner.write().await.users.insert(
            id,
            MemoryUser {
                display_name: display_name.map(String::from),
                stats: UserStat::default(),
            },
        );
    }

    /// Makes the next `n` inserts fail as if the token already existed.
    pub fn force_token_collisions(&self, n: usize) {
        self.forced_token_collisions.store(n, Ordering::SeqCst);
    }

    pub async fn set_stats(&self, id: Uuid, stats: UserStat) {
        if let Some(user) = self.inner.write().await.users.get_mut(&id) {
            user.stats = stats;
        }
    }

    pub async fn record_count(&self) -> usize {
        self.inner.read().await.records.len()
    }

    fn take_forced_collision(&self) -> bool {
        self.forced_token_collisions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn insert_with_stats(&self, new: NewAnalysis) -> Result<AnalysisRecord, StoreError> {
        if self.take_forced_collision() {
            return Err(StoreError::DuplicateShareToken);
        }

        let mut inner = self.inner.write().await;
        if inner.records.iter().any(|r| r.share_token == new.share_token) {
            return Err(StoreError::DuplicateShareToken);
        }
        let user = inner
            .users
            .get_mut(&new.owner_id)
            .ok_or(StoreError::UnknownOwner)?;
        user.record_score(new.result.ats_score);

        let result = new.result;
        let record = AnalysisRecord {
            id: Uuid::new_v4(),
            owner_id: new.owner_id,
            resume_file_name: new.resume_file_name,
            ats_score: result.ats_score,
            score_category: result.score_category,
            sub_scores: result.sub_scores,
            matched_keywords: result.matched_keywords,
            missing_keywords: result.missing_keywords,
            suggestions: result.suggestions,
            strengths: result.strengths,
            weaknesses: result.weaknesses,
            improvement_tip: result.improvement_tip,
            share_token: new.share_token,
            is_public: false,
            created_at: Utc::now(),
        };
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AnalysisRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.records.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<SharedAnalysis>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .find(|r| r.share_token == token)
            .map(|r| SharedAnalysis {
                record: r.clone(),
                owner_display_name: inner
                    .users
                    .get(&r.owner_id)
                    .and_then(|u| u.display_name.clone()),
            }))
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<AnalysisRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .rev()
            .filter(|r| r.owner_id == owner_id)
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn set_visibility(&self, id: Uuid, is_public: bool) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.is_public = is_public;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_with_stats(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(pos) = inner.records.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        let removed = inner.records.remove(pos);
        if let Some(user) = inner.users.get_mut(&removed.owner_id) {
            user.record_deletion();
        }
        Ok(true)
    }

    async fn user_stats(&self, owner_id: Uuid) -> Result<Option<UserStat>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&owner_id).map(|u| u.stats))
    }
}
