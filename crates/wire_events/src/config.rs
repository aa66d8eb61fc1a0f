use crate::error::ErrorDetailSink;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum ErrorDetailCapture {
    #[default]
    RedactedSummaryOnly,
    FullDetails,
}

/// Limits applied while splitting a body into records.
///
/// `max_line_bytes: None` keeps the splitter unbounded; a single record may then grow the
/// buffer without limit.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct DecodeLimits {
    pub max_line_bytes: Option<usize>,
}

#[derive(Default)]
pub struct DecodeConfig {
    pub limits: DecodeLimits,
    pub error_detail_capture: ErrorDetailCapture,
    pub error_sink: Option<Box<dyn ErrorDetailSink>>,
}

impl DecodeConfig {
    pub fn with_max_line_bytes(mut self, max_line_bytes: Option<usize>) -> Self {
        self.limits.max_line_bytes = max_line_bytes;
        self
    }

    pub fn with_error_sink(
        mut self,
        capture: ErrorDetailCapture,
        sink: impl ErrorDetailSink,
    ) -> Self {
        self.error_detail_capture = capture;
        self.error_sink = Some(Box::new(sink));
        self
    }
}

impl std::fmt::Debug for DecodeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeConfig")
            .field("limits", &self.limits)
            .field("error_detail_capture", &self.error_detail_capture)
            .field("error_sink", &self.error_sink.is_some())
            .finish()
    }
}
