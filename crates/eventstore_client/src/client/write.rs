use tracing::debug;
use wire_events::Event;

use super::{endpoints, EventStoreClient};
use crate::{
    request::{validate_subject, EventCandidate, Precondition, WriteEventsRequest},
    transport::Transport,
    ClientError,
};

impl<T: Transport> EventStoreClient<T> {
    /// Commits `candidates` atomically, guarded by `preconditions`.
    ///
    /// Returns the committed events with their server-assigned ids and times. A failed
    /// precondition surfaces as [`ClientError::UnexpectedStatus`] (typically 409).
    pub async fn write_events(
        &self,
        candidates: &[EventCandidate],
        preconditions: &[Precondition],
    ) -> Result<Vec<Event>, ClientError> {
        if candidates.is_empty() {
            return Err(ClientError::InvalidRequest("at least one event is required".to_string()));
        }
        for candidate in candidates {
            validate_subject(&candidate.subject)?;
        }

        let request = WriteEventsRequest {
            events: candidates,
            preconditions,
        };
        let response = self.post_json(endpoints::WRITE_EVENTS, &request).await?;
        let body = response.bytes().await?;
        let events: Vec<Event> =
            serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
                endpoint: endpoints::WRITE_EVENTS,
                source,
            })?;
        debug!(committed = events.len(), "events written");
        Ok(events)
    }
}
