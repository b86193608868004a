// LLM prompt constants for improvement tips.
// Scores are computed before the call and passed in; the model only phrases advice.

/// System prompt for the tip writer: plain prose, no markdown.
pub const TIP_SYSTEM: &str = "You are an experienced technical recruiter who knows how \
    applicant tracking systems parse resumes. \
    Respond with one short paragraph of plain text (at most three sentences). \
    Do NOT use markdown, bullet points, or headings. \
    Do NOT restate the scores.";

/// Tip prompt template. Replace `{ats_score}`, `{category}`, `{sub_scores}`
/// and `{weaknesses}` before sending.
pub const TIP_PROMPT_TEMPLATE: &str = r#"A resume was scored by a deterministic ATS checker.

Overall score: {ats_score}/100 ({category})
Sub-scores (0-100):
{sub_scores}

Identified weaknesses:
{weaknesses}

Write the single most valuable, concrete improvement the candidate should make next."#;
