//! Insight rules: deterministic suggestions, strengths and weaknesses.
//!
//! Two rule sets share the same checks with different thresholds:
//! - `assess` runs when an analysis is created and feeds the stored record.
//! - `improvement_suggestions` is the stricter list shown as next steps.
//!
//! Output order is fixed by rule order so identical inputs give identical lists.

use serde::Serialize;

use crate::ats::features::ExtractedFeatures;
use crate::models::analysis::SubScores;

const MIN_STRUCTURAL_HITS: usize = 3;
const MIN_INDUSTRY_HITS_AT_CREATION: usize = 2;
const MIN_INDUSTRY_HITS_FOR_SUGGESTIONS: usize = 3;
const MIN_LENGTH_AT_CREATION: usize = 800;
const SHORT_TEXT_WARNING_LENGTH: usize = 500;

const KEYWORD_STRENGTH_THRESHOLD: f64 = 70.0;
const SKILLS_STRENGTH_THRESHOLD: f64 = 70.0;
const FORMATTING_STRENGTH_THRESHOLD: f64 = 80.0;

pub const ADD_SECTIONS: &str =
    "Add more standard resume sections such as Experience, Skills, Education and Projects.";
pub const ADD_TECHNICAL_KEYWORDS: &str =
    "Include more technical keywords that match the roles you are targeting.";
pub const EXPAND_EXPERIENCE: &str =
    "Expand your experience descriptions with concrete responsibilities and measurable results.";
pub const SHORT_TEXT_WARNING: &str =
    "Your resume is very short. Expand your experience descriptions so ATS systems have enough content to match.";
pub const REMOVE_COMPLEX_FORMATTING: &str =
    "Remove tables, images and multi-column layouts; ATS parsers read plain single-column text most reliably.";
pub const UNREADABLE_DOCUMENT: &str =
    "We could not read the text of this document. Upload a text-based PDF for a detailed keyword analysis.";
pub const GENERIC_ENCOURAGEMENT: &str =
    "Your resume covers what ATS systems look for. Keep tailoring keywords to each job description.";

const SECTIONS_STRENGTH: &str = "Uses standard resume sections that ATS parsers recognize";
const SECTIONS_WEAKNESS: &str = "Missing several standard resume sections";
const SKILLS_STRENGTH: &str = "Good coverage of in-demand technical keywords";
const SKILLS_WEAKNESS: &str = "Few industry-relevant technical keywords";
const FORMATTING_STRENGTH: &str = "Clean, ATS-friendly formatting";
const FORMATTING_WEAKNESS: &str = "Tables, images or columns may confuse ATS parsers";
const CONTENT_NOT_ASSESSED: &str = "Resume text could not be read, so its content was not assessed";

/// Creation-time feedback stored on the analysis record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Assessment {
    pub suggestions: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Builds creation-time feedback. `features` is `None` on the metadata path;
/// the uniform fallback sub-scores say nothing about content, so that path
/// gets one neutral weakness and no strengths.
pub fn assess(features: Option<&ExtractedFeatures>, sub_scores: &SubScores) -> Assessment {
    let mut assessment = Assessment::default();

    let Some(f) = features else {
        assessment.suggestions = vec![UNREADABLE_DOCUMENT.to_string()];
        assessment.weaknesses = vec![CONTENT_NOT_ASSESSED.to_string()];
        return assessment;
    };

    let mut suggestions = Vec::new();
    if f.structural_count() < MIN_STRUCTURAL_HITS {
        suggestions.push(ADD_SECTIONS);
    }
    if f.industry_count() < MIN_INDUSTRY_HITS_AT_CREATION {
        suggestions.push(ADD_TECHNICAL_KEYWORDS);
    }
    if f.text_length < MIN_LENGTH_AT_CREATION {
        suggestions.push(EXPAND_EXPERIENCE);
    }
    if f.formatting_risk_count() > 0 {
        suggestions.push(REMOVE_COMPLEX_FORMATTING);
    }
    assessment.suggestions = with_encouragement(suggestions);

    classify(
        &mut assessment,
        sub_scores.keyword_match >= KEYWORD_STRENGTH_THRESHOLD,
        SECTIONS_STRENGTH,
        SECTIONS_WEAKNESS,
    );
    classify(
        &mut assessment,
        sub_scores.skills >= SKILLS_STRENGTH_THRESHOLD,
        SKILLS_STRENGTH,
        SKILLS_WEAKNESS,
    );
    classify(
        &mut assessment,
        sub_scores.formatting >= FORMATTING_STRENGTH_THRESHOLD,
        FORMATTING_STRENGTH,
        FORMATTING_WEAKNESS,
    );

    assessment
}

/// Next-step suggestions with the stricter thresholds.
pub fn improvement_suggestions(features: Option<&ExtractedFeatures>) -> Vec<String> {
    let Some(f) = features else {
        return vec![UNREADABLE_DOCUMENT.to_string()];
    };

    let mut out = Vec::new();
    if f.structural_count() < MIN_STRUCTURAL_HITS {
        out.push(ADD_SECTIONS);
    }
    if f.industry_count() < MIN_INDUSTRY_HITS_FOR_SUGGESTIONS {
        out.push(ADD_TECHNICAL_KEYWORDS);
    }
    if f.text_length < SHORT_TEXT_WARNING_LENGTH {
        out.push(SHORT_TEXT_WARNING);
    }
    if f.formatting_risk_count() > 0 {
        out.push(REMOVE_COMPLEX_FORMATTING);
    }
    with_encouragement(out)
}

fn with_encouragement(fired: Vec<&str>) -> Vec<String> {
    if fired.is_empty() {
        return vec![GENERIC_ENCOURAGEMENT.to_string()];
    }
    fired.into_iter().map(String::from).collect()
}

fn classify(assessment: &mut Assessment, is_strength: bool, strength: &str, weakness: &str) {
    if is_strength {
        assessment.strengths.push(strength.to_string());
    } else {
        assessment.weaknesses.push(weakness.to_string());
    }
}
