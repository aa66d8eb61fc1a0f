use serde_json::Value;

use crate::error::RecordError;

/// Line prefix used by Server-Sent-Events framing.
pub const SSE_DATA_PREFIX: &str = "data: ";

/// Turns one record into a JSON value.
///
/// - Returns `Ok(None)` for empty / whitespace-only records.
/// - Strips a single leading [`SSE_DATA_PREFIX`] before parsing.
/// - Returns `Err(RecordError::Json)` when the remainder is not JSON.
pub fn normalize_record(line: &str) -> Result<Option<Value>, RecordError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let payload = trimmed.strip_prefix(SSE_DATA_PREFIX).unwrap_or(trimmed);
    serde_json::from_str(payload)
        .map(Some)
        .map_err(|source| RecordError::Json { source })
}
