use std::fmt;

use reqwest::Url;

use crate::ClientError;

pub const ENV_URL: &str = "EVENTSTORE_URL";
pub const ENV_API_TOKEN: &str = "EVENTSTORE_API_TOKEN";
pub const ENV_API_VERSION: &str = "EVENTSTORE_API_VERSION";

pub const DEFAULT_API_VERSION: &str = "v1";

/// Immutable connection settings shared by every request of a client.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_version: String,
    pub api_token: Option<String>,
    /// Upper bound for a single NDJSON record; `None` leaves records unbounded.
    pub max_line_bytes: Option<usize>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            api_token: None,
            max_line_bytes: None,
        }
    }

    /// Reads `EVENTSTORE_URL`, `EVENTSTORE_API_TOKEN` and `EVENTSTORE_API_VERSION`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = non_empty(ENV_URL).ok_or(ClientError::MissingConfig(ENV_URL))?;
        let mut config = Self::new(base_url);
        config.api_token = non_empty(ENV_API_TOKEN);
        if let Some(version) = non_empty(ENV_API_VERSION) {
            config.api_version = version;
        }
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), ClientError> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };

        let url = Url::parse(&self.base_url).map_err(|err| invalid(err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
        }
        if self.api_version.trim().is_empty() {
            return Err(ClientError::MissingConfig("api_version"));
        }
        Ok(())
    }

    pub(crate) fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/api/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version,
            endpoint
        )
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("max_line_bytes", &self.max_line_bytes)
            .finish()
    }
}
