#![forbid(unsafe_code)]
//! Async client for an HTTP event store.
//!
//! Commits events with optional preconditions, reads the history of a subject, observes a live
//! tail of new events and runs queries. Response bodies are newline-delimited JSON and are
//! decoded incrementally by [`wire_events`]; a malformed record is logged and skipped, while a
//! failed request or non-success status fails the whole call.
//!
//! ```rust,no_run
//! use eventstore_client::{EventCandidate, EventStoreClient, Precondition};
//! use serde_json::json;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = EventStoreClient::from_env()?;
//! client.ping().await?;
//!
//! let candidate = EventCandidate::new(
//!     "https://shop.example.com",
//!     "/customer/123",
//!     "com.example.customer-registered",
//!     json!({ "name": "Jane" }),
//! );
//! client
//!     .write_events(&[candidate], &[Precondition::is_subject_pristine("/customer/123")])
//!     .await?;
//!
//! for event in client.read_events("/customer/123", None).await? {
//!     println!("{:?} {}", event.id, event.event_type);
//! }
//! # Ok(()) }
//! ```
//!
//! Requests go through the [`Transport`] trait; [`HttpTransport`] is the `reqwest`-backed
//! default and [`EventStoreClientBuilder::build_with_transport`] accepts any other implementation.

mod builder;
mod client;
mod config;
mod error;
mod request;
mod subjects;
mod transport;

pub use builder::EventStoreClientBuilder;
pub use client::{ErrorSinkFactory, EventStoreClient, EventStream};
pub use config::{ClientConfig, DEFAULT_API_VERSION, ENV_API_TOKEN, ENV_API_VERSION, ENV_URL};
pub use error::ClientError;
pub use request::{EventCandidate, Precondition, StreamOptions};
pub use transport::{
    ByteChunkStream, HttpTransport, Method, Transport, TransportRequest, TransportResponse,
};

pub use wire_events::{ErrorDetail, ErrorDetailCapture, ErrorDetailSink, Event, RecordErrorCode};
