//! Text encoding for sequence-valued columns (JSON arrays in TEXT).

use tracing::warn;
use uuid::Uuid;

pub fn encode_sequence(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes a stored sequence. A corrupted value is logged and discarded
/// (empty sequence) so one bad column never fails the whole read.
pub fn decode_sequence(raw: &str, column: &str, analysis_id: Uuid) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(items) => items,
        Err(e) => {
            warn!("Discarding corrupted {column} on analysis {analysis_id}: {e}");
            Vec::new()
        }
    }
}
