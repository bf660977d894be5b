//! Remote source of a published corpus.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::domain::{ContentMetadata, LearningModule, Lesson};
use crate::publish::layout;

/// Default timeout in seconds for a single corpus request
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-Agent string for corpus requests
const USER_AGENT: &str = concat!("curriculum/", env!("CARGO_PKG_VERSION"));

/// Errors raised by a [`ContentFetcher`]
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Read-only access to the three published corpus documents
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the freshness marker
    async fn fetch_metadata(&self) -> Result<ContentMetadata, FetchError>;

    /// Fetch the full lesson list
    async fn fetch_lessons(&self) -> Result<Vec<Lesson>, FetchError>;

    /// Fetch the full module list
    async fn fetch_modules(&self) -> Result<Vec<LearningModule>, FetchError>;
}

/// Fetches a corpus published under an HTTP(S) base URL
pub struct HttpFetcher {
    /// Base URL without trailing slash
    base_url: String,

    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a fetcher whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, relative: &str) -> String {
        format!("{}/{}", self.base_url, relative)
    }

    async fn get_json<T: DeserializeOwned>(&self, relative: &str) -> Result<T, FetchError> {
        let url = self.url(relative);
        debug!(%url, "Fetching corpus document");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|source| FetchError::Decode { url, source })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch_metadata(&self) -> Result<ContentMetadata, FetchError> {
        self.get_json(layout::METADATA_FILE).await
    }

    async fn fetch_lessons(&self) -> Result<Vec<Lesson>, FetchError> {
        self.get_json(layout::LESSONS_FILE).await
    }

    async fn fetch_modules(&self) -> Result<Vec<LearningModule>, FetchError> {
        self.get_json(layout::MODULES_FILE).await
    }
}
