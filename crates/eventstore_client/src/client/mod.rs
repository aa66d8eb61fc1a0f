use std::{fmt, sync::Arc};

use serde::Serialize;
use tracing::debug;
use wire_events::{DecodeConfig, ErrorDetailCapture, ErrorDetailSink};

use crate::{
    builder::EventStoreClientBuilder,
    config::ClientConfig,
    transport::{HttpTransport, Method, Transport, TransportRequest, TransportResponse},
    ClientError,
};

mod read;
mod write;

pub use read::EventStream;

pub(crate) mod endpoints {
    pub(crate) const PING: &str = "ping";
    pub(crate) const VERIFY_API_TOKEN: &str = "verify-api-token";
    pub(crate) const WRITE_EVENTS: &str = "write-events";
    pub(crate) const READ_EVENTS: &str = "read-events";
    pub(crate) const OBSERVE_EVENTS: &str = "observe-events";
    pub(crate) const RUN_QUERY: &str = "run-eventql-query";
    pub(crate) const READ_SUBJECTS: &str = "read-subjects";
}

/// Produces a fresh sink for each decoded response; every call owns its decoder.
pub type ErrorSinkFactory = Arc<dyn Fn() -> Box<dyn ErrorDetailSink> + Send + Sync>;

#[derive(Clone, Default)]
pub(crate) struct ErrorReporting {
    pub(crate) capture: ErrorDetailCapture,
    pub(crate) sink: Option<ErrorSinkFactory>,
}

impl fmt::Debug for ErrorReporting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorReporting")
            .field("capture", &self.capture)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// Client for the event store's HTTP API.
///
/// Holds only immutable configuration and a shareable transport; every call owns its own
/// response and decode buffer, so one client can serve concurrent reads and observations.
#[derive(Debug, Clone)]
pub struct EventStoreClient<T = HttpTransport> {
    pub(crate) config: ClientConfig,
    pub(crate) transport: T,
    pub(crate) error_reporting: ErrorReporting,
}

impl EventStoreClient<HttpTransport> {
    pub fn builder() -> EventStoreClientBuilder {
        EventStoreClientBuilder::default()
    }

    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Self::with_transport(config, HttpTransport::new())
    }

    /// Builds a client from `EVENTSTORE_URL` / `EVENTSTORE_API_TOKEN` / `EVENTSTORE_API_VERSION`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> EventStoreClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self {
            config,
            transport,
            error_reporting: ErrorReporting::default(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Checks that the server is reachable.
    pub async fn ping(&self) -> Result<(), ClientError> {
        let response = self.send(Method::Get, endpoints::PING, None).await?;
        ensure_success(endpoints::PING, response).await?;
        Ok(())
    }

    /// Checks that the configured API token is accepted.
    pub async fn verify_api_token(&self) -> Result<(), ClientError> {
        if self.config.api_token.is_none() {
            return Err(ClientError::MissingConfig("api_token"));
        }
        let response = self
            .send(Method::Post, endpoints::VERIFY_API_TOKEN, None)
            .await?;
        ensure_success(endpoints::VERIFY_API_TOKEN, response).await?;
        Ok(())
    }

    pub(crate) async fn post_json<B: Serialize>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<TransportResponse, ClientError> {
        let body = serde_json::to_string(body).map_err(ClientError::Serialize)?;
        let response = self.send(Method::Post, endpoint, Some(body)).await?;
        ensure_success(endpoint, response).await
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &'static str,
        body: Option<String>,
    ) -> Result<TransportResponse, ClientError> {
        let request = TransportRequest {
            method,
            url: self.config.endpoint_url(endpoint),
            bearer_token: self.config.api_token.clone(),
            body,
        };
        debug!(endpoint, method = ?request.method, "sending event store request");
        self.transport.send(request).await
    }

    /// Decode settings for one response. Builds a new sink when one is configured.
    pub(crate) fn decode_config(&self) -> DecodeConfig {
        let mut config = DecodeConfig::default().with_max_line_bytes(self.config.max_line_bytes);
        if let Some(factory) = &self.error_reporting.sink {
            config.error_detail_capture = self.error_reporting.capture;
            config.error_sink = Some(factory());
        }
        config
    }
}

/// Turns a non-success status into [`ClientError::UnexpectedStatus`], carrying the body text.
pub(crate) async fn ensure_success(
    endpoint: &'static str,
    response: TransportResponse,
) -> Result<TransportResponse, ClientError> {
    if response.is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = match response.bytes().await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(err) => {
            debug!(endpoint, status, error = %err, "failed reading error response body");
            String::new()
        }
    };
    debug!(endpoint, status, "event store rejected request");
    Err(ClientError::UnexpectedStatus {
        endpoint,
        status,
        body,
    })
}
