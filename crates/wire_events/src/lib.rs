#![forbid(unsafe_code)]
//! Incremental decoding of newline-delimited JSON into event-store items.
//!
//! The pipeline shared by every read path of the client:
//! - [`LineSplitter`] turns arbitrarily fragmented bytes into complete records.
//! - [`normalize_record`] drops blank records, strips the SSE `data: ` prefix and parses JSON.
//! - [`RecordMaterializer`] maps JSON into [`Event`]s (or raw values) in strict or tolerant mode.
//! - [`RecordDecoder`] wires the three together for one read; [`DecodeStream`] drives it lazily
//!   from a chunked async source.
//!
//! A record that fails at any step is reported and skipped; it never ends the read.

mod config;
mod decoder;
mod error;
mod event;
mod materialize;
mod normalize;
mod splitter;
mod stream;

pub use config::{DecodeConfig, DecodeLimits, ErrorDetailCapture};
pub use decoder::{DecodeStats, RecordDecoder};
pub use error::{ErrorDetail, ErrorDetailSink, RecordError, RecordErrorCode};
pub use event::Event;
pub use materialize::{
    is_keep_alive, materialize_record, EventMaterializer, MaterializeMode, RawMaterializer,
    RecordMaterializer, KEEP_ALIVE_KEY,
};
pub use normalize::{normalize_record, SSE_DATA_PREFIX};
pub use splitter::{LineSplitter, SplitLine};
pub use stream::DecodeStream;
