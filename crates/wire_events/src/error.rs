use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RecordErrorCode {
    InvalidUtf8,
    LineTooLong,
    JsonParse,
    Materialize,
}

impl RecordErrorCode {
    /// `true` for failures raised before a JSON value existed (the record could not be decoded).
    pub fn is_decode(self) -> bool {
        !matches!(self, RecordErrorCode::Materialize)
    }
}

/// Failure confined to a single record. The decoder reports these and moves on to the next
/// record; they never end a read.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record is not valid UTF-8")]
    InvalidUtf8,
    #[error("record too long (observed_bytes={observed_bytes}, max_line_bytes={max_line_bytes})")]
    LineTooLong {
        observed_bytes: usize,
        max_line_bytes: usize,
    },
    #[error("record is not valid JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },
    #[error("record is not a valid {expected}: {message}")]
    Materialize {
        expected: &'static str,
        message: String,
    },
}

impl RecordError {
    pub fn code(&self) -> RecordErrorCode {
        match self {
            RecordError::InvalidUtf8 => RecordErrorCode::InvalidUtf8,
            RecordError::LineTooLong { .. } => RecordErrorCode::LineTooLong,
            RecordError::Json { .. } => RecordErrorCode::JsonParse,
            RecordError::Materialize { .. } => RecordErrorCode::Materialize,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetail {
    pub line_number: usize,
    pub code: RecordErrorCode,
    pub details: String,
}

pub trait ErrorDetailSink: Send + 'static {
    fn on_error(&mut self, detail: ErrorDetail);
}

impl<F> ErrorDetailSink for F
where
    F: FnMut(ErrorDetail) + Send + 'static,
{
    fn on_error(&mut self, detail: ErrorDetail) {
        self(detail)
    }
}
