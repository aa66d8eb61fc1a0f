#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SplitLine {
    Line {
        line_number: usize,
        bytes: Vec<u8>,
    },
    LineTooLong {
        line_number: usize,
        observed_bytes: usize,
        max_line_bytes: usize,
    },
}

impl SplitLine {
    pub fn line_number(&self) -> usize {
        match self {
            SplitLine::Line { line_number, .. } | SplitLine::LineTooLong { line_number, .. } => {
                *line_number
            }
        }
    }
}

/// Splits arbitrarily fragmented input into newline-terminated records.
///
/// Works on bytes so a multi-byte UTF-8 sequence cut across two fragments is reassembled
/// before anyone decodes it. The same splitter serves a fully buffered body (one `feed`) and
/// a live connection (one `feed` per chunk).
#[derive(Debug, Clone, Default)]
pub struct LineSplitter {
    buffer: Vec<u8>,
    max_line_bytes: Option<usize>,
    line_number: usize,
    observed_bytes: usize,
    discard_mode: bool,
}

impl LineSplitter {
    pub fn new(max_line_bytes: Option<usize>) -> Self {
        Self {
            max_line_bytes,
            ..Self::default()
        }
    }

    /// Appends `fragment` and returns every line it completed, in order.
    ///
    /// Bytes after the last newline stay buffered for the next call.
    pub fn feed(&mut self, fragment: &[u8]) -> Vec<SplitLine> {
        let mut lines = Vec::new();
        let mut rest = fragment;
        while let Some(newline_idx) = rest.iter().position(|b| *b == b'\n') {
            self.absorb(&rest[..newline_idx]);
            lines.push(self.finish_line());
            rest = &rest[newline_idx + 1..];
        }
        self.absorb(rest);
        lines
    }

    /// Flushes a final record that never saw its terminating newline.
    ///
    /// Returns `None` when nothing is buffered.
    pub fn finish(&mut self) -> Option<SplitLine> {
        if self.observed_bytes == 0 {
            return None;
        }
        Some(self.finish_line())
    }

    /// Bytes currently held for the unterminated line.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    fn absorb(&mut self, segment: &[u8]) {
        if segment.is_empty() {
            return;
        }
        self.observed_bytes = self.observed_bytes.saturating_add(segment.len());
        if self.discard_mode {
            return;
        }
        if let Some(max_line_bytes) = self.max_line_bytes {
            // A trailing `\r` is part of the terminator, not the record.
            let terminator = usize::from(segment.last() == Some(&b'\r'));
            if self.observed_bytes - terminator > max_line_bytes {
                self.discard_mode = true;
                self.buffer = Vec::new();
                return;
            }
        }
        self.buffer.extend_from_slice(segment);
    }

    fn finish_line(&mut self) -> SplitLine {
        self.line_number += 1;
        let line_number = self.line_number;
        let observed_bytes = std::mem::take(&mut self.observed_bytes);

        if std::mem::take(&mut self.discard_mode) {
            return SplitLine::LineTooLong {
                line_number,
                observed_bytes,
                max_line_bytes: self.max_line_bytes.unwrap_or(usize::MAX),
            };
        }

        let mut bytes = std::mem::take(&mut self.buffer);
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        SplitLine::Line { line_number, bytes }
    }
}
