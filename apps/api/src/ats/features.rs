//! Feature extraction: case-insensitive substring scan over resume text.
//!
//! The three keyword sets are fixed contracts of the scoring model. Changing
//! them changes every score, so they are constants rather than config.

use serde::Serialize;

/// Standard resume sections ATS parsers look for.
pub const STRUCTURAL_KEYWORDS: &[&str] = &[
    "experience",
    "skills",
    "education",
    "projects",
    "certifications",
    "contact",
    "summary",
    "objective",
];

/// Representative technical terms recruiters filter on.
pub const INDUSTRY_KEYWORDS: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "react",
    "node",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "linux",
    "scrum",
    "machine learning",
    "rest api",
    "html",
    "css",
];

/// Markers of layouts that text-based ATS parsers mangle.
pub const FORMATTING_RISK_KEYWORDS: &[&str] = &["table", "image", "graphic", "column"];

/// Term that earns the project sub-score bonus.
pub const PROJECT_TERM: &str = "project";

/// Keyword hits and length for one resume text. Match lists keep set order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedFeatures {
    pub structural_matches: Vec<&'static str>,
    pub industry_matches: Vec<&'static str>,
    pub formatting_risks: Vec<&'static str>,
    pub mentions_project: bool,
    /// Length in characters, not bytes.
    pub text_length: usize,
}

impl ExtractedFeatures {
    pub fn structural_count(&self) -> usize {
        self.structural_matches.len()
    }

    pub fn industry_count(&self) -> usize {
        self.industry_matches.len()
    }

    pub fn formatting_risk_count(&self) -> usize {
        self.formatting_risks.len()
    }

    /// Structural keywords absent from the text, in set order.
    pub fn missing_structural(&self) -> Vec<&'static str> {
        STRUCTURAL_KEYWORDS
            .iter()
            .copied()
            .filter(|kw| !self.structural_matches.contains(kw))
            .collect()
    }
}

pub fn extract_features(text: &str) -> ExtractedFeatures {
    let lower = text.to_lowercase();

    ExtractedFeatures {
        structural_matches: matches_in(&lower, STRUCTURAL_KEYWORDS),
        industry_matches: matches_in(&lower, INDUSTRY_KEYWORDS),
        formatting_risks: matches_in(&lower, FORMATTING_RISK_KEYWORDS),
        mentions_project: lower.contains(PROJECT_TERM),
        text_length: text.chars().count(),
    }
}

fn matches_in(haystack: &str, keywords: &[&'static str]) -> Vec<&'static str> {
    keywords
        .iter()
        .copied()
        .filter(|kw| haystack.contains(kw))
        .collect()
}
