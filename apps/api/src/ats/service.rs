//! ATS service: the operations exposed to the HTTP layer.
//!
//! Flow for a new submission: evaluate → assess → tip → store (record + stats).
//! Every owner-scoped operation fetches by key, runs `authz`, then acts.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ats::analytics::{aggregate, AggregateStats};
use crate::ats::authz::{analysis_not_found, authorize_owner, authorize_public, shared_not_found};
use crate::ats::insights::{generate_feed, InsightFeed, INSIGHT_WINDOW};
use crate::ats::rules::{assess, improvement_suggestions};
use crate::ats::scoring::{evaluate, DocumentMeta};
use crate::ats::share_token::{generate_share_token, is_well_formed};
use crate::ats::tips::{TipContext, TipWriter};
use crate::errors::AppError;
use crate::models::analysis::{
    AnalysisRecord, NewAnalysis, PublicAnalysis, ScoredResult, ScoringPath,
};
use crate::models::user::UserStat;
use crate::store::{AnalysisStore, StoreError};

/// Identifiers handed back after a successful `record`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecordedAnalysis {
    pub id: Uuid,
    pub share_token: String,
}

#[derive(Clone)]
pub struct AtsService {
    store: Arc<dyn AnalysisStore>,
    tips: Arc<dyn TipWriter>,
}

impl AtsService {
    pub fn new(store: Arc<dyn AnalysisStore>, tips: Arc<dyn TipWriter>) -> Self {
        Self { store, tips }
    }

    /// Scores a document. Never fails: missing text switches to the metadata path.
    pub async fn score(&self, text: Option<&str>, meta: &DocumentMeta) -> ScoredResult {
        let evaluation = evaluate(text, meta);
        if evaluation.path == ScoringPath::Metadata {
            warn!(
                "No extractable text in '{}' ({} bytes); using metadata scoring",
                meta.file_name, meta.byte_size
            );
        }

        let features = evaluation.features.as_ref();
        let assessment = assess(features, &evaluation.sub_scores);
        let next_steps = improvement_suggestions(features);

        let improvement_tip = self
            .tips
            .write_tip(TipContext {
                ats_score: evaluation.ats_score,
                score_category: evaluation.score_category,
                sub_scores: &evaluation.sub_scores,
                weaknesses: &assessment.weaknesses,
            })
            .await;

        let (matched_keywords, missing_keywords) = match features {
            Some(f) => (
                f.structural_matches
                    .iter()
                    .chain(f.industry_matches.iter())
                    .map(|kw| kw.to_string())
                    .collect(),
                f.missing_structural().into_iter().map(String::from).collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        ScoredResult {
            ats_score: evaluation.ats_score,
            score_category: evaluation.score_category,
            sub_scores: evaluation.sub_scores,
            matched_keywords,
            missing_keywords,
            suggestions: assessment.suggestions,
            improvement_suggestions: next_steps,
            strengths: assessment.strengths,
            weaknesses: assessment.weaknesses,
            improvement_tip,
            scoring_path: evaluation.path,
        }
    }

    /// Persists a scored result and updates the owner's counters atomically.
    /// A share token collision is retried once with a fresh token.
    pub async fn record(
        &self,
        owner_id: Uuid,
        resume_file_name: &str,
        result: ScoredResult,
    ) -> Result<RecordedAnalysis, AppError> {
        let new = NewAnalysis {
            owner_id,
            resume_file_name: resume_file_name.to_string(),
            share_token: generate_share_token(),
            result,
        };

        let stored = match self.store.insert_with_stats(new.clone()).await {
            Err(StoreError::DuplicateShareToken) => {
                warn!("Share token collision for user {owner_id}; regenerating once");
                self.store
                    .insert_with_stats(NewAnalysis {
                        share_token: generate_share_token(),
                        ..new
                    })
                    .await?
            }
            other => other?,
        };

        info!(
            "Recorded analysis {} for user {owner_id}: {}/100 ({})",
            stored.id,
            stored.ats_score,
            stored.score_category.as_str()
        );

        Ok(RecordedAnalysis {
            id: stored.id,
            share_token: stored.share_token,
        })
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<AnalysisRecord>, AppError> {
        Ok(self.store.list_by_owner(owner_id, None).await?)
    }

    pub async fn get(&self, id: Uuid, owner_id: Uuid) -> Result<AnalysisRecord, AppError> {
        let record = self.store.find_by_id(id).await?;
        authorize_owner(record, id, owner_id)
    }

    pub async fn get_public(&self, token: &str) -> Result<PublicAnalysis, AppError> {
        if !is_well_formed(token) {
            return Err(shared_not_found());
        }
        let shared = self.store.find_by_token(token).await?;
        authorize_public(shared).map(PublicAnalysis::from)
    }

    /// Idempotent; the share token never changes.
    pub async fn set_visibility(
        &self,
        id: Uuid,
        owner_id: Uuid,
        is_public: bool,
    ) -> Result<(), AppError> {
        self.get(id, owner_id).await?;
        if !self.store.set_visibility(id, is_public).await? {
            return Err(analysis_not_found(id));
        }
        info!("Analysis {id} visibility set to public={is_public}");
        Ok(())
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
        self.get(id, owner_id).await?;
        if !self.store.delete_with_stats(id).await? {
            // Deleted concurrently by another request.
            return Err(analysis_not_found(id));
        }
        Ok(())
    }

    pub async fn analytics(&self, owner_id: Uuid) -> Result<AggregateStats, AppError> {
        let mut history = self.store.list_by_owner(owner_id, None).await?;
        history.reverse();
        Ok(aggregate(&history))
    }

    pub async fn insights(&self, owner_id: Uuid) -> Result<InsightFeed, AppError> {
        let recent = self
            .store
            .list_by_owner(owner_id, Some(INSIGHT_WINDOW))
            .await?;
        Ok(generate_feed(&recent))
    }

    pub async fn stats(&self, owner_id: Uuid) -> Result<UserStat, AppError> {
        Ok(self.store.user_stats(owner_id).await?.unwrap_or_default())
    }
}
