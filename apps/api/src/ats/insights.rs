//! Insight feed: each recent analysis compared with the one before it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::analysis::{AnalysisRecord, ScoreCategory};

/// Number of most recent analyses included in the feed.
pub const INSIGHT_WINDOW: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightEntry {
    pub analysis_id: Uuid,
    pub resume_file_name: String,
    pub ats_score: u8,
    pub score_category: ScoreCategory,
    pub created_at: DateTime<Utc>,
    /// Signed change from the next-older analysis. `None` for the oldest entry.
    pub score_delta: Option<f64>,
    pub comparison: Option<String>,
    pub top_suggestion: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsightFeed {
    pub insights: Vec<InsightEntry>,
}

/// Builds the feed from records ordered newest → oldest. Only the first
/// `INSIGHT_WINDOW` records are used; the last one in the window has no baseline.
pub fn generate_feed(recent: &[AnalysisRecord]) -> InsightFeed {
    let window = &recent[..recent.len().min(INSIGHT_WINDOW)];

    let insights = window
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let score_delta = window.get(i + 1).map(|baseline| {
                round_one_decimal(f64::from(record.ats_score) - f64::from(baseline.ats_score))
            });
            InsightEntry {
                analysis_id: record.id,
                resume_file_name: record.resume_file_name.clone(),
                ats_score: record.ats_score,
                score_category: record.score_category,
                created_at: record.created_at,
                score_delta,
                comparison: score_delta.map(describe_delta),
                top_suggestion: record.suggestions.first().cloned(),
            }
        })
        .collect();

    InsightFeed { insights }
}

pub fn describe_delta(delta: f64) -> String {
    if delta > 0.0 {
        format!("Score improved by +{delta:.1} points since your previous analysis")
    } else if delta < 0.0 {
        let drop = delta.abs();
        format!("Score dropped by {drop:.1} points since your previous analysis")
    } else {
        "Score unchanged (0.0 points) since your previous analysis".to_string()
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
