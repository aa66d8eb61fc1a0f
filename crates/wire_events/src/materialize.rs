use serde_json::Value;
use tracing::trace;

use crate::error::RecordError;
use crate::event::Event;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum MaterializeMode {
    /// Every normalized record becomes an item.
    #[default]
    Strict,
    /// Keep-alive records are dropped before materialization.
    Tolerant,
}

/// Maps a normalized JSON record into the item type a read path yields.
pub trait RecordMaterializer {
    type Item;

    fn mode(&self) -> MaterializeMode;
    fn materialize(&mut self, value: Value) -> Result<Self::Item, RecordError>;
}

/// Key of the placeholder field a keep-alive record carries.
pub const KEEP_ALIVE_KEY: &str = "payload";

/// `{"payload": ""}` and nothing else.
pub fn is_keep_alive(value: &Value) -> bool {
    let Some(map) = value.as_object() else {
        return false;
    };
    map.len() == 1 && map.get(KEEP_ALIVE_KEY).and_then(Value::as_str) == Some("")
}

/// Applies the materializer's mode, then materializes.
///
/// Returns `Ok(None)` for a keep-alive dropped in tolerant mode.
pub fn materialize_record<M: RecordMaterializer>(
    materializer: &mut M,
    value: Value,
) -> Result<Option<M::Item>, RecordError> {
    if materializer.mode() == MaterializeMode::Tolerant && is_keep_alive(&value) {
        trace!("dropping keep-alive record");
        return Ok(None);
    }
    materializer.materialize(value).map(Some)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EventMaterializer {
    mode: MaterializeMode,
}

impl EventMaterializer {
    pub fn new(mode: MaterializeMode) -> Self {
        Self { mode }
    }

    pub fn strict() -> Self {
        Self::new(MaterializeMode::Strict)
    }

    pub fn tolerant() -> Self {
        Self::new(MaterializeMode::Tolerant)
    }
}

impl RecordMaterializer for EventMaterializer {
    type Item = Event;

    fn mode(&self) -> MaterializeMode {
        self.mode
    }

    fn materialize(&mut self, value: Value) -> Result<Event, RecordError> {
        if !value.is_object() {
            return Err(RecordError::Materialize {
                expected: "event",
                message: format!("expected a JSON object, found {}", json_kind(&value)),
            });
        }
        serde_json::from_value(value).map_err(|err| RecordError::Materialize {
            expected: "event",
            message: err.to_string(),
        })
    }
}

/// Passes records through as raw JSON (query results carry no envelope).
#[derive(Debug, Clone, Copy, Default)]
pub struct RawMaterializer {
    mode: MaterializeMode,
}

impl RawMaterializer {
    pub fn new(mode: MaterializeMode) -> Self {
        Self { mode }
    }
}

impl RecordMaterializer for RawMaterializer {
    type Item = Value;

    fn mode(&self) -> MaterializeMode {
        self.mode
    }

    fn materialize(&mut self, value: Value) -> Result<Value, RecordError> {
        Ok(value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
