use std::sync::Arc;

use wire_events::{ErrorDetailCapture, ErrorDetailSink};

use crate::{
    client::{ErrorReporting, EventStoreClient},
    config::{ClientConfig, DEFAULT_API_VERSION},
    transport::{HttpTransport, Transport},
    ClientError,
};

#[derive(Debug, Clone)]
pub struct EventStoreClientBuilder {
    pub(crate) base_url: Option<String>,
    pub(crate) api_version: String,
    pub(crate) api_token: Option<String>,
    pub(crate) max_line_bytes: Option<usize>,
    pub(crate) http_client: Option<reqwest::Client>,
    pub(crate) error_reporting: ErrorReporting,
}

impl Default for EventStoreClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            api_token: None,
            max_line_bytes: None,
            http_client: None,
            error_reporting: ErrorReporting::default(),
        }
    }
}

impl EventStoreClientBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Caps the size of a single NDJSON record; larger records are skipped and logged.
    pub fn max_line_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_line_bytes = limit;
        self
    }

    /// Reuses a preconfigured `reqwest` client (timeouts, proxies, TLS roots).
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Receives every record a read skips, with its line number.
    ///
    /// `factory` runs once per decoded response. `capture` decides whether the raw record is
    /// copied into [`wire_events::ErrorDetail::details`].
    pub fn error_sink<F>(mut self, capture: ErrorDetailCapture, factory: F) -> Self
    where
        F: Fn() -> Box<dyn ErrorDetailSink> + Send + Sync + 'static,
    {
        self.error_reporting = ErrorReporting {
            capture,
            sink: Some(Arc::new(factory)),
        };
        self
    }

    pub fn build(self) -> Result<EventStoreClient, ClientError> {
        let mut this = self;
        let transport = match this.http_client.take() {
            Some(client) => HttpTransport::with_client(client),
            None => HttpTransport::new(),
        };
        this.build_with_transport(transport)
    }

    /// Builds a client that sends requests through `transport` instead of HTTP.
    pub fn build_with_transport<T: Transport>(
        self,
        transport: T,
    ) -> Result<EventStoreClient<T>, ClientError> {
        let base_url = self
            .base_url
            .ok_or(ClientError::MissingConfig("base_url"))?;
        let config = ClientConfig {
            base_url,
            api_version: self.api_version,
            api_token: self.api_token,
            max_line_bytes: self.max_line_bytes,
        };
        let mut client = EventStoreClient::with_transport(config, transport)?;
        client.error_reporting = self.error_reporting;
        Ok(client)
    }
}
