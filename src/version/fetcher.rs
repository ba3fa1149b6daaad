//! Cached HTTP fetching with a uniform error contract

use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use tracing::{debug, warn};

use crate::config::USER_AGENT;
use crate::version::cache::CacheStore;
use crate::version::error::FetchError;

/// Trait for retrieving raw upstream content by URL
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the body at `url`
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - The non-empty response body
    /// * `Err(FetchError)` - Transport failure, non-success status, or empty body
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetches `url` and decodes it as (lossy) UTF-8
pub async fn fetch_text(fetcher: &dyn Fetcher, url: &str) -> Result<String, FetchError> {
    let body = fetcher.fetch(url).await?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Fetcher performing live GET requests through a [`CacheStore`]
pub struct HttpFetcher {
    client: reqwest::Client,
    cache: Arc<dyn CacheStore>,
}

impl HttpFetcher {
    /// Creates a new HttpFetcher whose requests give up after `timeout`
    pub fn new(cache: Arc<dyn CacheStore>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, cache })
    }

    async fn fetch_live(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream returned status {}: {}", status, url);
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        match self.cache.get(url) {
            Ok(Some(entry)) => {
                debug!("Cache hit for {} (fetched at {})", url, entry.fetched_at);
                return Ok(entry.body);
            }
            Ok(None) => debug!("Cache miss for {}", url),
            Err(e) => warn!("Failed to read cache for {}: {}", url, e),
        }

        let body = self.fetch_live(url).await?;

        // An empty body also clears whatever stale entry was left behind
        if let Err(e) = self.cache.put(url, &body) {
            warn!("Failed to write cache for {}: {}", url, e);
        }

        if body.is_empty() {
            return Err(FetchError::Empty(url.to_string()));
        }

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
