//! Hosting-provider tag API strategy

use serde::Deserialize;
use tracing::warn;

use crate::version::error::FetchError;
use crate::version::fetcher::Fetcher;
use crate::version::filter::Exclusions;
use crate::version::strategy::{Strategy, normalize_tag};

/// Default base URL for GitHub API
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Entry of a tag-list response
#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

/// Strategy reading a JSON array of `{"name": ...}` tag objects
pub struct TagApiStrategy {
    url: String,
    marker: Option<String>,
    separator: Option<char>,
    exclusions: Exclusions,
}

impl TagApiStrategy {
    /// Creates a strategy reading tags from an arbitrary tag-list URL
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            marker: None,
            separator: None,
            exclusions: Exclusions::default(),
        }
    }

    /// Creates a strategy for a GitHub repository (`owner/repo`)
    pub fn github(repo: &str) -> Self {
        Self::new(&format!("{}/repos/{}/tags?per_page=100", DEFAULT_BASE_URL, repo))
    }

    /// Only accept tags starting with `marker`, which is stripped
    pub fn marker(mut self, marker: &str) -> Self {
        self.marker = Some(marker.to_string());
        self
    }

    /// Rewrite `separator` inside the tag to `.`
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }

    pub fn exclude(mut self, exclusions: Exclusions) -> Self {
        self.exclusions = exclusions;
        self
    }
}

#[async_trait::async_trait]
impl Strategy for TagApiStrategy {
    fn kind(&self) -> &'static str {
        "tag-api"
    }

    async fn candidates(
        &self,
        fetcher: &dyn Fetcher,
        _selector: Option<&str>,
    ) -> Result<Vec<String>, FetchError> {
        let body = fetcher.fetch(&self.url).await?;

        // A malformed payload (rate-limit notice, HTML error page) yields no candidates
        let tags: Vec<Tag> = match serde_json::from_slice(&body) {
            Ok(tags) => tags,
            Err(e) => {
                warn!("Failed to parse tag list from {}: {}", self.url, e);
                return Ok(Vec::new());
            }
        };

        Ok(tags
            .iter()
            .filter_map(|tag| normalize_tag(&tag.name, self.marker.as_deref(), self.separator))
            .collect())
    }

    fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }
}
