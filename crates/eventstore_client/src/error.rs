use thiserror::Error;

/// Errors surfaced to callers of [`crate::EventStoreClient`].
///
/// Failures of individual records inside a response body are not represented here; the
/// decoder logs and skips them.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("base URL `{url}` is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
    #[error("request is invalid: {0}")]
    InvalidRequest(String),
    #[error("HTTP request to `{url}` failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed reading response body: {0}")]
    Io(#[from] std::io::Error),
    #[error("{endpoint} returned status {status}: {body}")]
    UnexpectedStatus {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("{endpoint} succeeded but the response has no readable body")]
    MissingBody { endpoint: &'static str },
    #[error("failed to encode request body: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// `true` when the request reached (or tried to reach) the server and the exchange failed.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Http { .. } | ClientError::Io(_) | ClientError::UnexpectedStatus { .. }
        )
    }

    /// HTTP status of a rejected request, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            ClientError::Http { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
