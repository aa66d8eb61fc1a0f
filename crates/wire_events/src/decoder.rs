use tracing::{debug, warn};

use crate::config::{DecodeConfig, ErrorDetailCapture};
use crate::error::{ErrorDetail, RecordError};
use crate::materialize::{materialize_record, RecordMaterializer};
use crate::normalize::normalize_record;
use crate::splitter::{LineSplitter, SplitLine};

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct DecodeStats {
    /// Lines produced by the splitter, blank ones included.
    pub lines: usize,
    /// Items handed to the caller.
    pub items: usize,
    /// Keep-alive records dropped in tolerant mode.
    pub dropped: usize,
    /// Records skipped because they failed to decode or materialize.
    pub failures: usize,
}

/// Splitter, normalizer and materializer wired together for one read.
///
/// Owns its buffer; create one per request and discard it when the body ends. Failures on a
/// single record are logged, forwarded to the configured [`crate::ErrorDetailSink`] and
/// skipped.
pub struct RecordDecoder<M: RecordMaterializer> {
    splitter: LineSplitter,
    materializer: M,
    config: DecodeConfig,
    stats: DecodeStats,
}

impl<M: RecordMaterializer> RecordDecoder<M> {
    pub fn new(materializer: M, config: DecodeConfig) -> Self {
        Self {
            splitter: LineSplitter::new(config.limits.max_line_bytes),
            materializer,
            config,
            stats: DecodeStats::default(),
        }
    }

    /// Feeds one transport fragment and returns the items it completed.
    pub fn feed(&mut self, fragment: &[u8]) -> Vec<M::Item> {
        let lines = self.splitter.feed(fragment);
        lines
            .into_iter()
            .filter_map(|line| self.process(line))
            .collect()
    }

    /// Signals end of source, flushing an unterminated trailing record.
    pub fn finish(&mut self) -> Vec<M::Item> {
        let items: Vec<_> = self
            .splitter
            .finish()
            .and_then(|line| self.process(line))
            .into_iter()
            .collect();
        debug!(
            lines = self.stats.lines,
            items = self.stats.items,
            dropped = self.stats.dropped,
            failures = self.stats.failures,
            "record decoder reached end of source"
        );
        items
    }

    /// Decodes a fully buffered body in one pass.
    pub fn decode_all(mut self, body: &[u8]) -> Vec<M::Item> {
        let mut items = self.feed(body);
        items.extend(self.finish());
        items
    }

    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    fn process(&mut self, line: SplitLine) -> Option<M::Item> {
        self.stats.lines += 1;
        let (line_number, bytes) = match line {
            SplitLine::Line { line_number, bytes } => (line_number, bytes),
            SplitLine::LineTooLong {
                line_number,
                observed_bytes,
                max_line_bytes,
            } => {
                let err = RecordError::LineTooLong {
                    observed_bytes,
                    max_line_bytes,
                };
                self.report(line_number, err, None);
                return None;
            }
        };

        let Ok(text) = std::str::from_utf8(&bytes) else {
            self.report(line_number, RecordError::InvalidUtf8, None);
            return None;
        };

        let value = match normalize_record(text) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(err) => {
                self.report(line_number, err, Some(text));
                return None;
            }
        };

        match materialize_record(&mut self.materializer, value) {
            Ok(Some(item)) => {
                self.stats.items += 1;
                Some(item)
            }
            Ok(None) => {
                self.stats.dropped += 1;
                None
            }
            Err(err) => {
                self.report(line_number, err, Some(text));
                None
            }
        }
    }

    fn report(&mut self, line_number: usize, err: RecordError, raw: Option<&str>) {
        self.stats.failures += 1;
        let code = err.code();
        warn!(line_number, code = ?code, error = %err, "skipping undecodable record");

        let details = match (self.config.error_detail_capture, raw) {
            (ErrorDetailCapture::FullDetails, Some(raw)) => format!("{err}: `{raw}`"),
            _ => err.to_string(),
        };
        if let Some(sink) = self.config.error_sink.as_mut() {
            sink.on_error(ErrorDetail {
                line_number,
                code,
                details,
            });
        }
    }
}

impl<M: RecordMaterializer + std::fmt::Debug> std::fmt::Debug for RecordDecoder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordDecoder")
            .field("splitter", &self.splitter)
            .field("materializer", &self.materializer)
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish()
    }
}
