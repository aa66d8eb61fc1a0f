use serde_json::Value;
use wire_events::{MaterializeMode, RecordError, RecordMaterializer};

/// Materializes `{"subject": "/..."}` records from `read-subjects` into subject paths.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SubjectMaterializer;

impl RecordMaterializer for SubjectMaterializer {
    type Item = String;

    fn mode(&self) -> MaterializeMode {
        MaterializeMode::Tolerant
    }

    fn materialize(&mut self, value: Value) -> Result<String, RecordError> {
        value
            .get("subject")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| RecordError::Materialize {
                expected: "subject",
                message: "record has no string `subject`".to_string(),
            })
    }
}
