//! Improvement tips: pluggable writer for the free-text `improvement_tip`.
//!
//! Default: `RuleTipWriter` (deterministic, targets the weakest sub-score).
//! Optional: `LlmTipWriter`, enabled via `ENABLE_LLM_TIPS`. It never fails the
//! request: any LLM error falls back to the rule tip.
//!
//! `AppState` carries an `Arc<dyn TipWriter>` chosen at startup.

use async_trait::async_trait;
use tracing::warn;

use crate::ats::prompts::{TIP_PROMPT_TEMPLATE, TIP_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::analysis::{ScoreCategory, SubScores};

/// Sub-score at or above which a dimension needs no tip.
const WELL_COVERED: f64 = 85.0;

/// Inputs available to a tip writer.
#[derive(Debug, Clone, Copy)]
pub struct TipContext<'a> {
    pub ats_score: u8,
    pub score_category: ScoreCategory,
    pub sub_scores: &'a SubScores,
    pub weaknesses: &'a [String],
}

#[async_trait]
pub trait TipWriter: Send + Sync {
    async fn write_tip(&self, ctx: TipContext<'_>) -> String;
}

pub struct RuleTipWriter;

#[async_trait]
impl TipWriter for RuleTipWriter {
    async fn write_tip(&self, ctx: TipContext<'_>) -> String {
        rule_tip(ctx.sub_scores)
    }
}

pub struct LlmTipWriter(pub LlmClient);

#[async_trait]
impl TipWriter for LlmTipWriter {
    async fn write_tip(&self, ctx: TipContext<'_>) -> String {
        let prompt = build_tip_prompt(&ctx);
        match self.0.complete_text(&prompt, TIP_SYSTEM).await {
            Ok(tip) => tip,
            Err(e) => {
                warn!("LLM tip generation failed, using rule tip: {e}");
                rule_tip(ctx.sub_scores)
            }
        }
    }
}

/// Tip for the weakest dimension; ties go to the earlier dimension.
/// `ats_compatible` mirrors `formatting` and is not considered separately.
pub fn rule_tip(sub_scores: &SubScores) -> String {
    let dimensions = [
        (sub_scores.keyword_match, "Add clearly labelled sections (Summary, Experience, Skills, Education, Projects) so ATS parsers can map your content."),
        (sub_scores.skills, "Mirror the technical keywords from the job posting in your Skills section and experience bullets."),
        (sub_scores.formatting, "Switch to a single-column layout without tables, images or graphics so the text parses cleanly."),
        (sub_scores.experience, "Add more detail to each role: responsibilities, technologies used and measurable outcomes."),
        (sub_scores.project, "Add a Projects section that shows what you built, the stack you used and the result."),
    ];

    let mut weakest = &dimensions[0];
    for dimension in &dimensions[1..] {
        if dimension.0 < weakest.0 {
            weakest = dimension;
        }
    }

    if weakest.0 >= WELL_COVERED {
        "Your resume is in great shape. Tailor the wording to each job description before applying.".to_string()
    } else {
        weakest.1.to_string()
    }
}

fn build_tip_prompt(ctx: &TipContext<'_>) -> String {
    let s = ctx.sub_scores;
    let sub_scores = format!(
        "- keyword match: {:.0}\n- skills: {:.0}\n- formatting: {:.0}\n- experience: {:.0}\n- projects: {:.0}\n- ATS compatibility: {:.0}",
        s.keyword_match, s.skills, s.formatting, s.experience, s.project, s.ats_compatible
    );
    let weaknesses = if ctx.weaknesses.is_empty() {
        "- none".to_string()
    } else {
        ctx.weaknesses
            .iter()
            .map(|w| format!("- {w}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    TIP_PROMPT_TEMPLATE
        .replace("{ats_score}", &ctx.ats_score.to_string())
        .replace("{category}", ctx.score_category.as_str())
        .replace("{sub_scores}", &sub_scores)
        .replace("{weaknesses}", &weaknesses)
}
