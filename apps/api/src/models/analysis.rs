use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse label derived from the composite ATS score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ScoreCategory {
    Poor,
    Average,
    Good,
    Excellent,
}

impl ScoreCategory {
    /// Fixed thresholds: ≥85 Excellent, ≥70 Good, ≥50 Average, else Poor.
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 85 => ScoreCategory::Excellent,
            s if s >= 70 => ScoreCategory::Good,
            s if s >= 50 => ScoreCategory::Average,
            _ => ScoreCategory::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreCategory::Poor => "Poor",
            ScoreCategory::Average => "Average",
            ScoreCategory::Good => "Good",
            ScoreCategory::Excellent => "Excellent",
        }
    }
}

/// The six per-dimension scores, each in [0, 100].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SubScores {
    pub keyword_match: f64,
    pub skills: f64,
    pub formatting: f64,
    pub experience: f64,
    pub project: f64,
    pub ats_compatible: f64,
}

impl SubScores {
    pub fn uniform(value: f64) -> Self {
        Self {
            keyword_match: value,
            skills: value,
            formatting: value,
            experience: value,
            project: value,
            ats_compatible: value,
        }
    }
}

/// Which scoring path produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPath {
    /// Extracted resume text was available.
    Text,
    /// Extraction failed; scored from file size and name only.
    Metadata,
}

/// Output of the scoring pipeline, before persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredResult {
    pub ats_score: u8,
    pub score_category: ScoreCategory,
    #[serde(flatten)]
    pub sub_scores: SubScores,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvement_tip: String,
    pub scoring_path: ScoringPath,
}

/// One persisted, scored resume submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub resume_file_name: String,
    pub ats_score: u8,
    pub score_category: ScoreCategory,
    #[serde(flatten)]
    pub sub_scores: SubScores,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvement_tip: String,
    pub share_token: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload handed to the store. The store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub owner_id: Uuid,
    pub resume_file_name: String,
    pub share_token: String,
    pub result: ScoredResult,
}

/// A record found by share token plus the owner's display name. Never
/// serialized directly; anonymous readers get a [`PublicAnalysis`].
#[derive(Debug, Clone)]
pub struct SharedAnalysis {
    pub record: AnalysisRecord,
    pub owner_display_name: Option<String>,
}

/// What an anonymous share-link reader sees. The owner id is also the
/// request principal, so it stays out of this view.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublicAnalysis {
    pub id: Uuid,
    pub resume_file_name: String,
    pub ats_score: u8,
    pub score_category: ScoreCategory,
    #[serde(flatten)]
    pub sub_scores: SubScores,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvement_tip: String,
    pub created_at: DateTime<Utc>,
    pub owner_display_name: Option<String>,
}

impl From<SharedAnalysis> for PublicAnalysis {
    fn from(shared: SharedAnalysis) -> Self {
        let SharedAnalysis {
            record,
            owner_display_name,
        } = shared;
        Self {
            id: record.id,
            resume_file_name: record.resume_file_name,
            ats_score: record.ats_score,
            score_category: record.score_category,
            sub_scores: record.sub_scores,
            matched_keywords: record.matched_keywords,
            missing_keywords: record.missing_keywords,
            suggestions: record.suggestions,
            strengths: record.strengths,
            weaknesses: record.weaknesses,
            improvement_tip: record.improvement_tip,
            created_at: record.created_at,
            owner_display_name,
        }
    }
}

/// Minimal record for unit tests elsewhere in the crate.
#[cfg(test)]
pub fn test_record(owner_id: Uuid, ats_score: u8, created_at: DateTime<Utc>) -> AnalysisRecord {
    AnalysisRecord {
        id: Uuid::new_v4(),
        owner_id,
        resume_file_name: "resume.pdf".to_string(),
        ats_score,
        score_category: ScoreCategory::from_score(ats_score),
        sub_scores: SubScores::uniform(f64::from(ats_score)),
        matched_keywords: vec![],
        missing_keywords: vec![],
        suggestions: vec![],
        strengths: vec![],
        weaknesses: vec![],
        improvement_tip: String::new(),
        share_token: crate::ats::share_token::generate_share_token(),
        is_public: false,
        created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_boundaries() {
        assert_eq!(ScoreCategory::from_score(100), ScoreCategory::Excellent);
        assert_eq!(ScoreCategory::from_score(85), ScoreCategory::Excellent);
        assert_eq!(ScoreCategory::from_score(84), ScoreCategory::Good);
        assert_eq!(ScoreCategory::from_score(70), ScoreCategory::Good);
        assert_eq!(ScoreCategory::from_score(69), ScoreCategory::Average);
        assert_eq!(ScoreCategory::from_score(50), ScoreCategory::Average);
        assert_eq!(ScoreCategory::from_score(49), ScoreCategory::Poor);
        assert_eq!(ScoreCategory::from_score(0), ScoreCategory::Poor);
    }

    #[test]
    fn test_category_serializes_as_title_case() {
        let json = serde_json::to_string(&ScoreCategory::Excellent).unwrap();
        assert_eq!(json, "\"Excellent\"");
        assert_eq!(ScoreCategory::Average.as_str(), "Average");
    }

    #[test]
    fn test_sub_scores_flatten_into_result_json() {
        let result = ScoredResult {
            ats_score: 70,
            score_category: ScoreCategory::Good,
            sub_scores: SubScores::uniform(70.0),
            matched_keywords: vec![],
            missing_keywords: vec![],
            suggestions: vec![],
            improvement_suggestions: vec![],
            strengths: vec![],
            weaknesses: vec![],
            improvement_tip: String::new(),
            scoring_path: ScoringPath::Metadata,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["keyword_match"], 70.0);
        assert_eq!(value["scoring_path"], "metadata");
    }

    #[test]
    fn test_public_view_omits_owner() {
        let owner = Uuid::new_v4();
        let record = test_record(owner, 72, Utc::now());
        let public = PublicAnalysis::from(SharedAnalysis {
            record: record.clone(),
            owner_display_name: Some("Ada".to_string()),
        });
        assert_eq!(public.id, record.id);

        let value = serde_json::to_value(&public).unwrap();
        assert!(value.get("owner_id").is_none());
        assert!(value.get("share_token").is_none());
        assert!(!value.to_string().contains(&owner.to_string()));
        assert_eq!(value["owner_display_name"], "Ada");
        assert_eq!(value["keyword_match"], 72.0);
    }
}
