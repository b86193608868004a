//! Scoring engine: deterministic composite score plus six sub-scores.
//!
//! Primary path scores extracted text. When extraction failed the engine
//! falls back to document metadata so the user always gets a result.

use serde::{Deserialize, Serialize};

use crate::ats::features::{extract_features, ExtractedFeatures, STRUCTURAL_KEYWORDS};
use crate::models::analysis::{ScoreCategory, ScoringPath, SubScores};

const BASE_SCORE: f64 = 40.0;
const STRUCTURAL_POINTS: f64 = 8.0;
const INDUSTRY_POINTS: f64 = 3.0;
const FORMATTING_PENALTY: f64 = 10.0;
const LENGTH_BONUS_DIVISOR: f64 = 200.0;
const LENGTH_BONUS_CAP: f64 = 25.0;

/// Industry hits at which the skills sub-score saturates.
const SKILLS_SATURATION: f64 = 5.0;
const FORMATTING_SUB_PENALTY: f64 = 15.0;
const EXPERIENCE_FULL_LENGTH: f64 = 1500.0;
const PROJECT_PRESENT: f64 = 85.0;
const PROJECT_ABSENT: f64 = 60.0;

const FALLBACK_BASE: f64 = 75.0;
const FALLBACK_SMALL_FILE_BYTES: u64 = 50_000;
const FALLBACK_LARGE_FILE_BYTES: u64 = 2_000_000;
const FALLBACK_MIN: f64 = 60.0;
const FALLBACK_MAX: f64 = 85.0;

/// Metadata of the uploaded document, available even when extraction fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentMeta {
    pub file_name: String,
    pub byte_size: u64,
}

/// Score, category and sub-scores for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub ats_score: u8,
    pub score_category: ScoreCategory,
    pub sub_scores: SubScores,
    pub path: ScoringPath,
    /// `None` on the metadata path.
    pub features: Option<ExtractedFeatures>,
}

/// Scores a document. Absent or whitespace-only text means extraction
/// failed and the metadata path is used.
pub fn evaluate(text: Option<&str>, meta: &DocumentMeta) -> Evaluation {
    match text.filter(|t| !t.trim().is_empty()) {
        Some(text) => {
            let features = extract_features(text);
            let ats_score = composite_score(&features);
            Evaluation {
                ats_score,
                score_category: ScoreCategory::from_score(ats_score),
                sub_scores: sub_scores(&features),
                path: ScoringPath::Text,
                features: Some(features),
            }
        }
        None => {
            let ats_score = fallback_score(meta);
            Evaluation {
                ats_score,
                score_category: ScoreCategory::from_score(ats_score),
                sub_scores: SubScores::uniform(f64::from(ats_score)),
                path: ScoringPath::Metadata,
                features: None,
            }
        }
    }
}

/// 40 + 8/section + 3/industry term + min(len/200, 25) − 10/formatting risk.
pub fn composite_score(features: &ExtractedFeatures) -> u8 {
    let length_bonus =
        (features.text_length as f64 / LENGTH_BONUS_DIVISOR).min(LENGTH_BONUS_CAP);
    let raw = BASE_SCORE
        + features.structural_count() as f64 * STRUCTURAL_POINTS
        + features.industry_count() as f64 * INDUSTRY_POINTS
        + length_bonus
        - features.formatting_risk_count() as f64 * FORMATTING_PENALTY;
    clamp_percent(raw).round() as u8
}

pub fn sub_scores(features: &ExtractedFeatures) -> SubScores {
    let formatting = clamp_percent(
        100.0 - features.formatting_risk_count() as f64 * FORMATTING_SUB_PENALTY,
    );
    SubScores {
        keyword_match: clamp_percent(
            features.structural_count() as f64 / STRUCTURAL_KEYWORDS.len() as f64 * 100.0,
        ),
        skills: clamp_percent(features.industry_count() as f64 / SKILLS_SATURATION * 100.0),
        formatting,
        experience: clamp_percent(features.text_length as f64 / EXPERIENCE_FULL_LENGTH * 100.0),
        project: if features.mentions_project {
            PROJECT_PRESENT
        } else {
            PROJECT_ABSENT
        },
        ats_compatible: formatting,
    }
}

/// Metadata-only score, always within [60, 85].
pub fn fallback_score(meta: &DocumentMeta) -> u8 {
    let mut score = FALLBACK_BASE;
    if meta.byte_size < FALLBACK_SMALL_FILE_BYTES {
        score -= 10.0;
    }
    if meta.byte_size > FALLBACK_LARGE_FILE_BYTES {
        score -= 15.0;
    }
    let name = meta.file_name.to_lowercase();
    if name.contains("resume") || name.contains("cv") {
        score += 5.0;
    }
    score.clamp(FALLBACK_MIN, FALLBACK_MAX).round() as u8
}

/// Clamps into [0, 100]; NaN maps to 0.
fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
