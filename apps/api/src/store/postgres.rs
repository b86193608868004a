//! PostgreSQL adapter.
//!
//! `insert_with_stats` and `delete_with_stats` run in a single transaction and
//! update counters with in-place expressions, so concurrent requests for the
//! same user cannot lose an increment or regress `best_ats_score`.
//!
//! The tests at the bottom need a live database and read `TEST_DATABASE_URL`;
//! they return early when it is unset.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::analysis::{
    AnalysisRecord, NewAnalysis, ScoreCategory, SharedAnalysis, SubScores,
};
use crate::models::user::UserStat;
use crate::store::codec::{decode_sequence, encode_sequence};
use crate::store::{AnalysisStore, StoreError};

#[derive(Debug, Clone, FromRow)]
struct AnalysisRow {
    id: Uuid,
    user_id: Uuid,
    resume_file_name: String,
    ats_score: i32,
    keyword_match: f64,
    skills: f64,
    formatting: f64,
    experience: f64,
    project: f64,
    ats_compatible: f64,
    matched_keywords: String,
    missing_keywords: String,
    suggestions: String,
    strengths: String,
    weaknesses: String,
    improvement_tip: String,
    share_token: String,
    is_public: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct SharedRow {
    #[sqlx(flatten)]
    analysis: AnalysisRow,
    owner_display_name: Option<String>,
}

impl AnalysisRow {
    fn into_record(self) -> AnalysisRecord {
        let ats_score = self.ats_score.clamp(0, 100) as u8;
        let id = self.id;
        AnalysisRecord {
            id,
            owner_id: self.user_id,
            resume_file_name: self.resume_file_name,
            ats_score,
            // Category is a pure function of the score; never trust a stored label.
            score_category: ScoreCategory::from_score(ats_score),
            sub_scores: SubScores {
                keyword_match: self.keyword_match,
                skills: self.skills,
                formatting: self.formatting,
                experience: self.experience,
                project: self.project,
                ats_compatible: self.ats_compatible,
            },
            matched_keywords: decode_sequence(&self.matched_keywords, "matched_keywords", id),
            missing_keywords: decode_sequence(&self.missing_keywords, "missing_keywords", id),
            suggestions: decode_sequence(&self.suggestions, "suggestions", id),
            strengths: decode_sequence(&self.strengths, "strengths", id),
            weaknesses: decode_sequence(&self.weaknesses, "weaknesses", id),
            improvement_tip: self.improvement_tip,
            share_token: self.share_token,
            is_public: self.is_public,
            created_at: self.created_at,
        }
    }
}

const ANALYSIS_COLUMNS: &str = "a.id, a.user_id, a.resume_file_name, a.ats_score, \
    a.keyword_match, a.skills, a.formatting, a.experience, a.project, a.ats_compatible, \
    a.matched_keywords, a.missing_keywords, a.suggestions, a.strengths, a.weaknesses, \
    a.improvement_tip, a.share_token, a.is_public, a.created_at";

#[derive(Clone)]
pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps constraint violations on insert to domain errors.
fn classify_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateShareToken;
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::UnknownOwner;
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn insert_with_stats(&self, new: NewAnalysis) -> Result<AnalysisRecord, StoreError> {
        let NewAnalysis {
            owner_id,
            resume_file_name,
            share_token,
            result,
        } = new;
        let score = i32::from(result.ats_score);
        let subs = result.sub_scores;

        let mut tx = self.pool.begin().await?;

        // Counters first: the row lock serialises creates per user, so the
        // commit order matches `created_at` and `last_ats_score` stays on
        // the newest record.
        let updated = sqlx::query(
            r#"
            UPDATE users
            SET total_resumes_analyzed = total_resumes_analyzed + 1,
                last_ats_score = $1,
                best_ats_score = GREATEST(best_ats_score, $1)
            WHERE id = $2
            "#,
        )
        .bind(score)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::UnknownOwner);
        }

        // clock_timestamp(), not now(): the stamp must be taken after the lock.
        let row: AnalysisRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO ats_analyses AS a
                (id, user_id, resume_file_name, ats_score, score_category,
                 keyword_match, skills, formatting, experience, project, ats_compatible,
                 matched_keywords, missing_keywords, suggestions, strengths, weaknesses,
                 improvement_tip, share_token, is_public, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                    $12, $13, $14, $15, $16, $17, $18, FALSE, clock_timestamp())
            RETURNING {ANALYSIS_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&resume_file_name)
        .bind(score)
        .bind(result.score_category.as_str())
        .bind(subs.keyword_match)
        .bind(subs.skills)
        .bind(subs.formatting)
        .bind(subs.experience)
        .bind(subs.project)
        .bind(subs.ats_compatible)
        .bind(encode_sequence(&result.matched_keywords))
        .bind(encode_sequence(&result.missing_keywords))
        .bind(encode_sequence(&result.suggestions))
        .bind(encode_sequence(&result.strengths))
        .bind(encode_sequence(&result.weaknesses))
        .bind(&result.improvement_tip)
        .bind(&share_token)
        .fetch_one(&mut *tx)
        .await
        // Dropping the transaction rolls back the counter update.
        .map_err(classify_insert_error)?;

        tx.commit().await?;

        info!("Stored ATS analysis {} for user {owner_id} (score {score})", row.id);
        Ok(row.into_record())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AnalysisRecord>, StoreError> {
        let row: Option<AnalysisRow> = sqlx::query_as(&format!(
            "SELECT {ANALYSIS_COLUMNS} FROM ats_analyses a WHERE a.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(AnalysisRow::into_record))
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<SharedAnalysis>, StoreError> {
        let row: Option<SharedRow> = sqlx::query_as(&format!(
            r#"
            SELECT {ANALYSIS_COLUMNS}, u.display_name AS owner_display_name
            FROM ats_analyses a
            JOIN users u ON u.id = a.user_id
            WHERE a.share_token = $1
            "#
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| SharedAnalysis {
            record: r.analysis.into_record(),
            owner_display_name: r.owner_display_name,
        }))
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<AnalysisRecord>, StoreError> {
        // LIMIT NULL means no limit in PostgreSQL.
        let limit = limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX));
        let rows: Vec<AnalysisRow> = sqlx::query_as(&format!(
            r#"
            SELECT {ANALYSIS_COLUMNS}
            FROM ats_analyses a
            WHERE a.user_id = $1
            ORDER BY a.created_at DESC, a.id DESC
            LIMIT $2
            "#
        ))
        .bind(owner_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(AnalysisRow::into_record).collect())
    }

    async fn set_visibility(&self, id: Uuid, is_public: bool) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE ats_analyses SET is_public = $1 WHERE id = $2")
            .bind(is_public)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_with_stats(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let owner_id: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM ats_analyses WHERE id = $1 RETURNING user_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(owner_id) = owner_id else {
            return Ok(false);
        };

        sqlx::query(
            r#"
            UPDATE users
            SET total_resumes_analyzed = GREATEST(total_resumes_analyzed - 1, 0)
            WHERE id = $1
            "#,
        )
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Deleted ATS analysis {id} for user {owner_id}");
        Ok(true)
    }

    async fn user_stats(&self, owner_id: Uuid) -> Result<Option<UserStat>, StoreError> {
        Ok(sqlx::query_as::<_, UserStat>(
            r#"
            SELECT total_resumes_analyzed, best_ats_score, last_ats_score
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
