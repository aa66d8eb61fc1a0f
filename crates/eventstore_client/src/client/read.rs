use std::pin::Pin;

use futures_core::Stream;
use futures_util::StreamExt;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use wire_events::{
    DecodeStream, Event, EventMaterializer, MaterializeMode, RawMaterializer, RecordDecoder,
    RecordMaterializer,
};

use super::{endpoints, EventStoreClient};
use crate::{
    request::{validate_subject, QueryRequest, ReadSubjectsRequest, StreamOptions, SubjectRequest},
    subjects::SubjectMaterializer,
    transport::Transport,
    ClientError,
};

/// Live, single-use sequence of observed events.
///
/// Ends normally when the server closes the connection, or with one final `Err` when the
/// connection fails. Dropping it closes the connection.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<Event, ClientError>> + Send>>;

impl<T: Transport> EventStoreClient<T> {
    /// Reads the events recorded for `subject`, in the order the server returns them.
    ///
    /// A non-success response fails the whole call; undecodable records are skipped.
    pub async fn read_events(
        &self,
        subject: &str,
        options: Option<&StreamOptions>,
    ) -> Result<Vec<Event>, ClientError> {
        validate_subject(subject)?;
        let request = SubjectRequest::new(subject, options);
        self.fetch_records(
            endpoints::READ_EVENTS,
            &request,
            EventMaterializer::new(MaterializeMode::Strict),
        )
        .await
    }

    /// Observes `subject`, yielding events as they arrive.
    ///
    /// Request and status failures are returned before the stream exists. Keep-alive records
    /// sent on the idle connection are dropped.
    ///
    /// ```rust,no_run
    /// use eventstore_client::{EventStoreClient, StreamOptions};
    /// use futures_util::StreamExt;
    /// # async fn run() -> Result<(), eventstore_client::ClientError> {
    /// let client = EventStoreClient::builder()
    ///     .base_url("http://localhost:3000")
    ///     .api_token("secret")
    ///     .build()?;
    /// let options = StreamOptions::new().lower_bound("41");
    /// let mut events = client.observe_events("/customer/123", Some(&options)).await?;
    /// while let Some(event) = events.next().await {
    ///     let event = event?;
    ///     println!("{} {}", event.event_type, event.data);
    /// }
    /// # Ok(()) }
    /// ```
    pub async fn observe_events(
        &self,
        subject: &str,
        options: Option<&StreamOptions>,
    ) -> Result<EventStream, ClientError> {
        validate_subject(subject)?;
        let request = SubjectRequest::new(subject, options);
        let response = self.post_json(endpoints::OBSERVE_EVENTS, &request).await?;
        let body = response.into_body().ok_or(ClientError::MissingBody {
            endpoint: endpoints::OBSERVE_EVENTS,
        })?;

        let decoder = RecordDecoder::new(
            EventMaterializer::new(MaterializeMode::Tolerant),
            self.decode_config(),
        );
        let events = DecodeStream::new(body, decoder).map(|item| item.map_err(ClientError::Io));
        Ok(Box::pin(events))
    }

    /// Runs a query and returns each result row as raw JSON. The query text is passed through
    /// untouched.
    pub async fn run_query(&self, query: &str) -> Result<Vec<Value>, ClientError> {
        if query.trim().is_empty() {
            return Err(ClientError::InvalidRequest("query must not be empty".to_string()));
        }
        self.fetch_records(
            endpoints::RUN_QUERY,
            &QueryRequest { query },
            RawMaterializer::new(MaterializeMode::Strict),
        )
        .await
    }

    /// Lists `base_subject` and every subject below it.
    pub async fn read_subjects(&self, base_subject: &str) -> Result<Vec<String>, ClientError> {
        validate_subject(base_subject)?;
        self.fetch_records(
            endpoints::READ_SUBJECTS,
            &ReadSubjectsRequest { base_subject },
            SubjectMaterializer,
        )
        .await
    }

    async fn fetch_records<B, M>(
        &self,
        endpoint: &'static str,
        request: &B,
        materializer: M,
    ) -> Result<Vec<M::Item>, ClientError>
    where
        B: Serialize,
        M: RecordMaterializer,
    {
        let response = self.post_json(endpoint, request).await?;
        let body = response.bytes().await?;
        if body.is_empty() {
            debug!(endpoint, "empty response body");
            return Ok(Vec::new());
        }

        let decoder = RecordDecoder::new(materializer, self.decode_config());
        let items = decoder.decode_all(&body);
        debug!(endpoint, items = items.len(), "decoded response body");
        Ok(items)
    }
}
