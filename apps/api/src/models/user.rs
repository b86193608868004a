use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// ATS counters kept on the user row.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct UserStat {
    pub total_resumes_analyzed: i64,
    pub best_ats_score: i32,
    pub last_ats_score: i32,
}
