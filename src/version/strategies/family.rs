//! Release-line family strategy
//!
//! Packages such as `node22` or `python3.13` pin a release line. Resolution
//! runs in two steps: list the lines the upstream currently publishes, then
//! resolve the newest version inside the requested line only.

use regex::Regex;
use tracing::{debug, warn};

use crate::version::compare::{latest, natural_cmp};
use crate::version::error::FetchError;
use crate::version::fetcher::{Fetcher, fetch_text};
use crate::version::filter::Exclusions;
use crate::version::strategy::{Strategy, capture_all};

const LINE_PLACEHOLDER: &str = "{line}";

/// Strategy resolving the latest version of one release line
pub struct FamilyStrategy {
    lines_url: String,
    lines_pattern: Regex,
    detail_url: String,
    detail_template: String,
    exclusions: Exclusions,
}

impl FamilyStrategy {
    /// Creates a family strategy
    ///
    /// # Arguments
    /// * `lines_url` - Page listing the published release lines
    /// * `lines_pattern` - Regex whose first group captures a line (e.g. `22` or `3.13`)
    /// * `detail_url` - Page listing versions of one line; `{line}` is substituted
    /// * `detail_template` - Regex whose first group captures a version; `{line}` is
    ///   substituted with the escaped line
    pub fn new(
        lines_url: &str,
        lines_pattern: &str,
        detail_url: &str,
        detail_template: &str,
    ) -> Self {
        Self {
            lines_url: lines_url.to_string(),
            lines_pattern: Regex::new(lines_pattern).expect("valid family lines pattern"),
            detail_url: detail_url.to_string(),
            detail_template: detail_template.to_string(),
            exclusions: Exclusions::default(),
        }
    }

    pub fn exclude(mut self, exclusions: Exclusions) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Fetches the currently published release lines
    pub async fn supported_lines(&self, fetcher: &dyn Fetcher) -> Result<Vec<String>, FetchError> {
        let index = fetch_text(fetcher, &self.lines_url).await?;

        let mut lines = capture_all(&self.lines_pattern, &index);
        lines.sort_by(|a, b| natural_cmp(a, b));
        lines.dedup();

        debug!("Supported lines from {}: {:?}", self.lines_url, lines);
        Ok(lines)
    }

    async fn line_candidates(
        &self,
        fetcher: &dyn Fetcher,
        line: &str,
    ) -> Result<Vec<String>, FetchError> {
        let url = self.detail_url.replace(LINE_PLACEHOLDER, line);
        let pattern = self
            .detail_template
            .replace(LINE_PLACEHOLDER, &regex::escape(line));
        let pattern = match Regex::new(&pattern) {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!("Invalid detail pattern for line {}: {}", line, e);
                return Ok(Vec::new());
            }
        };

        let detail = fetch_text(fetcher, &url).await?;
        let prefix = format!("{}.", line);

        Ok(capture_all(&pattern, &detail)
            .into_iter()
            .filter(|candidate| candidate == line || candidate.starts_with(&prefix))
            .collect())
    }
}

#[async_trait::async_trait]
impl Strategy for FamilyStrategy {
    fn kind(&self) -> &'static str {
        "family"
    }

    /// Without a selector the newest supported line is used
    ///
    /// Registry entries always pass a selector (`node22`); the `None` case
    /// only serves direct library callers.
    async fn candidates(
        &self,
        fetcher: &dyn Fetcher,
        selector: Option<&str>,
    ) -> Result<Vec<String>, FetchError> {
        let lines = self.supported_lines(fetcher).await?;

        let line = match selector {
            Some(selector) if lines.iter().any(|line| line == selector) => selector.to_string(),
            Some(selector) => {
                debug!("Release line {} is not published upstream", selector);
                return Ok(Vec::new());
            }
            None => match latest(&lines) {
                Some(line) => line,
                None => return Ok(Vec::new()),
            },
        };

        self.line_candidates(fetcher, &line).await
    }

    fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }
}
