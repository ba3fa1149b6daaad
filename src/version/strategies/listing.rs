//! Mirror directory listing strategy

use regex::Regex;

use crate::version::error::FetchError;
use crate::version::fetcher::{Fetcher, fetch_text};
use crate::version::filter::Exclusions;
use crate::version::strategy::{Strategy, capture_all};

/// Version-looking run: digits, then dot-separated alphanumeric parts
pub const VERSION_PATTERN: &str = r"\d+(?:\.[0-9A-Za-z]+)*";

/// Strategy scanning a directory listing for `prefix + version + suffix` file names
pub struct ListingStrategy {
    url: String,
    pattern: Regex,
    exclusions: Exclusions,
}

impl ListingStrategy {
    /// Matches file names like `{prefix}{version}{suffix}`, e.g. `bash-` + `5.2.37` + `.tar.gz`
    ///
    /// `prefix` and `suffix` are literal text.
    pub fn new(url: &str, prefix: &str, suffix: &str) -> Self {
        let pattern = format!(
            "{}({}){}",
            regex::escape(prefix),
            VERSION_PATTERN,
            regex::escape(suffix)
        );
        Self::with_pattern(url, &pattern)
    }

    /// Uses a raw regex; the first capture group is the version
    pub fn with_pattern(url: &str, pattern: &str) -> Self {
        Self {
            url: url.to_string(),
            pattern: Regex::new(pattern).expect("valid listing pattern"),
            exclusions: Exclusions::default(),
        }
    }

    /// Matches `{name}-{version}.tar.` archives in a GNU mirror project directory
    pub fn gnu(name: &str) -> Self {
        Self::new(&format!("https://ftp.gnu.org/gnu/{}/", name), &format!("{}-", name), ".tar.")
    }

    pub fn exclude(mut self, exclusions: Exclusions) -> Self {
        self.exclusions = exclusions;
        self
    }
}

#[async_trait::async_trait]
impl Strategy for ListingStrategy {
    fn kind(&self) -> &'static str {
        "listing"
    }

    async fn candidates(
        &self,
        fetcher: &dyn Fetcher,
        _selector: Option<&str>,
    ) -> Result<Vec<String>, FetchError> {
        let listing = fetch_text(fetcher, &self.url).await?;
        Ok(capture_all(&self.pattern, &listing))
    }

    fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }
}
