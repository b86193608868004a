// ATS scoring and analytics engine.
// Implements: feature extraction, scoring, insight rules, improvement tips,
// share tokens, ownership checks, analytics, and the insight feed.
// Persistence goes through `crate::store`; no SQL in this module.

pub mod analytics;
pub mod authz;
pub mod extraction;
pub mod features;
pub mod handlers;
pub mod insights;
pub mod prompts;
pub mod rules;
pub mod scoring;
pub mod service;
pub mod share_token;
pub mod tips;
