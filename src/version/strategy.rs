//! Extraction strategy trait
//!
//! A strategy turns fetched upstream content into version candidates.
//! Filtering and picking the latest candidate is shared by every strategy.

use regex::Regex;
use tracing::debug;

use crate::version::compare::latest;
use crate::version::error::{FetchError, StrategyError};
use crate::version::fetcher::Fetcher;
use crate::version::filter::Exclusions;

/// Trait for one upstream shape (tag API, git refs, directory listing, ...)
#[async_trait::async_trait]
pub trait Strategy: Send + Sync {
    /// Short name used in logs
    fn kind(&self) -> &'static str;

    /// Fetches upstream content and extracts every version-looking candidate
    ///
    /// # Arguments
    /// * `selector` - Release line requested through a family name (e.g. "22" for "node22")
    async fn candidates(
        &self,
        fetcher: &dyn Fetcher,
        selector: Option<&str>,
    ) -> Result<Vec<String>, FetchError>;

    /// Rules removing pre-releases and platform builds before comparison
    fn exclusions(&self) -> &Exclusions;

    /// Resolves the latest acceptable candidate
    ///
    /// Default implementation filters [`Strategy::candidates`] through
    /// [`Strategy::exclusions`] and returns the natural maximum.
    async fn resolve(
        &self,
        fetcher: &dyn Fetcher,
        selector: Option<&str>,
    ) -> Result<String, StrategyError> {
        let candidates = self.candidates(fetcher, selector).await?;
        let total = candidates.len();
        let accepted = self.exclusions().apply(candidates);

        debug!(
            "{}: {} candidates, {} accepted",
            self.kind(),
            total,
            accepted.len()
        );

        latest(accepted).ok_or(StrategyError::NoCandidate)
    }
}

/// Collects the first capture group of every match of `pattern` in `text`
pub fn capture_all(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Normalizes a raw tag: strips `marker` and rewrites `separator` to `.`
///
/// Returns `None` when a marker is configured but the tag does not carry it.
pub fn normalize_tag(tag: &str, marker: Option<&str>, separator: Option<char>) -> Option<String> {
    let stripped = match marker {
        Some(marker) => tag.strip_prefix(marker)?,
        None => tag,
    };
    Some(match separator {
        Some(sep) => stripped.replace(sep, "."),
        None => stripped.to_string(),
    })
}
