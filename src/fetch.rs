//! Raw content retrieval over HTTP.
//!
//! Uses reqwest with a browser User-Agent. Every call carries its own timeout;
//! a timeout is reported like any other network failure.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
}

/// Retrieves raw markup or bytes for a URL.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// GET the URL and return the body as text
    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;

    /// GET the URL and return the raw body
    async fn get_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError>;
}

/// reqwest-backed fetcher shared by all extractors
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<reqwest::Response, FetchError> {
        tracing::debug!(url, timeout_secs = timeout.as_secs(), "fetching");
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let response = self.get(url, timeout).await?;
        Ok(response.text().await?)
    }

    async fn get_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url, timeout).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
