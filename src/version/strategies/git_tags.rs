//! Git remote tag listing strategy
//!
//! Reads the smart-HTTP ref advertisement (`info/refs?service=git-upload-pack`),
//! the same ref list `git ls-remote --tags` prints, without needing git installed.

use crate::version::error::FetchError;
use crate::version::fetcher::Fetcher;
use crate::version::filter::Exclusions;
use crate::version::strategy::{Strategy, normalize_tag};

const TAG_NAMESPACE: &str = "refs/tags/";

/// Strategy listing tags of a remote git repository
pub struct GitTagsStrategy {
    repo_url: String,
    marker: Option<String>,
    separator: Option<char>,
    exclusions: Exclusions,
}

impl GitTagsStrategy {
    pub fn new(repo_url: &str) -> Self {
        Self {
            repo_url: repo_url.trim_end_matches('/').to_string(),
            marker: None,
            separator: None,
            exclusions: Exclusions::default(),
        }
    }

    pub fn marker(mut self, marker: &str) -> Self {
        self.marker = Some(marker.to_string());
        self
    }

    pub fn separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }

    pub fn exclude(mut self, exclusions: Exclusions) -> Self {
        self.exclusions = exclusions;
        self
    }

    fn refs_url(&self) -> String {
        format!("{}/info/refs?service=git-upload-pack", self.repo_url)
    }
}

/// Extracts tag names from a ref listing
///
/// Accepts both pkt-line advertisements (`003f<hash> refs/tags/v1.0\0caps`)
/// and ls-remote output (`<hash>\trefs/tags/v1.0`). Peeled entries (`^{}`)
/// are folded into their tag.
pub fn parse_tag_refs(listing: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    for line in listing.lines() {
        let Some(start) = line.find(TAG_NAMESPACE) else {
            continue;
        };
        let rest = &line[start + TAG_NAMESPACE.len()..];
        let name = rest
            .split(['\0', ' ', '\t'])
            .next()
            .unwrap_or_default();
        let name = name.strip_suffix("^{}").unwrap_or(name);

        if !name.is_empty() && !tags.iter().any(|t| t == name) {
            tags.push(name.to_string());
        }
    }

    tags
}

#[async_trait::async_trait]
impl Strategy for GitTagsStrategy {
    fn kind(&self) -> &'static str {
        "git-tags"
    }

    async fn candidates(
        &self,
        fetcher: &dyn Fetcher,
        _selector: Option<&str>,
    ) -> Result<Vec<String>, FetchError> {
        let body = fetcher.fetch(&self.refs_url()).await?;
        let listing = String::from_utf8_lossy(&body);

        Ok(parse_tag_refs(&listing)
            .iter()
            .filter_map(|tag| normalize_tag(tag, self.marker.as_deref(), self.separator))
            .collect())
    }

    fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }
}
