//! Analytics aggregation over a user's full analysis history.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::analysis::{AnalysisRecord, ScoreCategory};

/// Number of most recent analyses plotted in the trend.
pub const TREND_WINDOW: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    #[serde(rename = "Poor")]
    pub poor: usize,
    #[serde(rename = "Average")]
    pub average: usize,
    #[serde(rename = "Good")]
    pub good: usize,
    #[serde(rename = "Excellent")]
    pub excellent: usize,
}

impl ScoreDistribution {
    fn bump(&mut self, category: ScoreCategory) {
        match category {
            ScoreCategory::Poor => self.poor += 1,
            ScoreCategory::Average => self.average += 1,
            ScoreCategory::Good => self.good += 1,
            ScoreCategory::Excellent => self.excellent += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub total_analyses: usize,
    pub average_score: f64,
    pub score_distribution: ScoreDistribution,
    /// Oldest first, at most `TREND_WINDOW` points.
    pub trend_data: Vec<TrendPoint>,
    pub improvement_percentage: f64,
}

/// Aggregates a history ordered oldest → newest.
pub fn aggregate(history: &[AnalysisRecord]) -> AggregateStats {
    let total_analyses = history.len();

    let average_score = if total_analyses == 0 {
        0.0
    } else {
        history.iter().map(|r| f64::from(r.ats_score)).sum::<f64>() / total_analyses as f64
    };

    let mut score_distribution = ScoreDistribution::default();
    for record in history {
        score_distribution.bump(ScoreCategory::from_score(record.ats_score));
    }

    let trend_data = history[total_analyses.saturating_sub(TREND_WINDOW)..]
        .iter()
        .map(|r| TrendPoint {
            date: r.created_at.date_naive(),
            score: r.ats_score,
        })
        .collect();

    AggregateStats {
        total_analyses,
        average_score,
        score_distribution,
        trend_data,
        improvement_percentage: improvement_percentage(history),
    }
}

/// (last − first) / first × 100. Zero with fewer than two analyses, and zero
/// when the first score is 0 since no relative change is defined.
pub fn improvement_percentage(history: &[AnalysisRecord]) -> f64 {
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        return 0.0;
    };
    if history.len() < 2 || first.ats_score == 0 {
        return 0.0;
    }
    let first = f64::from(first.ats_score);
    (f64::from(last.ats_score) - first) / first * 100.0
}
