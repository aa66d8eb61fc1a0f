use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use crate::ClientError;

/// Type-erased body of a response, read chunk by chunk.
pub type ByteChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub bearer_token: Option<String>,
    /// JSON request body.
    pub body: Option<String>,
}

pub struct TransportResponse {
    status: u16,
    body: Option<ByteChunkStream>,
}

impl TransportResponse {
    pub fn new(status: u16, body: Option<ByteChunkStream>) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Hands over the incremental body, if the transport provided one.
    pub fn into_body(self) -> Option<ByteChunkStream> {
        self.body
    }

    /// Drains the body into memory. A response without a body reads as empty.
    pub async fn bytes(self) -> Result<Vec<u8>, std::io::Error> {
        let Some(mut body) = self.body else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        while let Some(chunk) = body.next().await {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("body", &self.body.is_some())
            .finish()
    }
}

/// Sends one request to the event store.
///
/// The client owns URL assembly and body encoding; a transport only moves bytes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, ClientError>;
}

/// [`Transport`] backed by a `reqwest` client. Response bodies are streamed, never buffered by
/// the transport itself.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, ClientError> {
        let TransportRequest {
            method,
            url,
            bearer_token,
            body,
        } = request;

        let mut builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        builder = builder.header(ACCEPT, "application/x-ndjson, application/json");
        if let Some(token) = bearer_token.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| ClientError::Http {
                url: url.clone(),
                source,
            })?;
        let status = response.status().as_u16();
        debug!(%url, status, "event store responded");

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(std::io::Error::other));
        Ok(TransportResponse::new(status, Some(Box::pin(chunks))))
    }
}
