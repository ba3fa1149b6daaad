//! Vendor download page scraping strategy
//!
//! Brittle by nature: a page redesign silently turns into "no candidates".

use regex::Regex;

use crate::version::error::FetchError;
use crate::version::fetcher::{Fetcher, fetch_text};
use crate::version::filter::Exclusions;
use crate::version::strategies::listing::VERSION_PATTERN;
use crate::version::strategy::{Strategy, capture_all};

/// Strategy extracting the version printed next to a fixed phrase on a page
pub struct PhraseStrategy {
    url: String,
    pattern: Regex,
    exclusions: Exclusions,
}

impl PhraseStrategy {
    /// `template` is a regex in which `{version}` marks the version position,
    /// e.g. `Latest Release \({version}\)`.
    pub fn new(url: &str, template: &str) -> Self {
        let pattern = template.replace("{version}", &format!("({})", VERSION_PATTERN));
        Self {
            url: url.to_string(),
            pattern: Regex::new(&pattern).expect("valid phrase pattern"),
            exclusions: Exclusions::default(),
        }
    }

    pub fn exclude(mut self, exclusions: Exclusions) -> Self {
        self.exclusions = exclusions;
        self
    }
}

#[async_trait::async_trait]
impl Strategy for PhraseStrategy {
    fn kind(&self) -> &'static str {
        "phrase"
    }

    async fn candidates(
        &self,
        fetcher: &dyn Fetcher,
        _selector: Option<&str>,
    ) -> Result<Vec<String>, FetchError> {
        let page = fetch_text(fetcher, &self.url).await?;
        Ok(capture_all(&self.pattern, &page))
    }

    fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }
}
