//! Resolver registry: maps package names to strategies
//!
//! Categories are consulted in priority order. The first category that
//! recognizes a name resolves it; the others decline. A name no category
//! recognizes is an unknown package.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::version::error::ResolveError;
use crate::version::fetcher::Fetcher;
use crate::version::strategy::Strategy;
use crate::version::types::{AbsentReason, Resolution};

/// How an entry recognizes package names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatcher {
    /// Exactly this name
    Exact(String),
    /// `prefix` followed by a release-line selector such as `22` or `3.13`
    Family {
        prefix: String,
        /// Lines listed in the catalog; resolution accepts any well-formed selector
        lines: Vec<String>,
    },
}

impl NameMatcher {
    pub fn exact(name: &str) -> Self {
        NameMatcher::Exact(name.to_string())
    }

    pub fn family(prefix: &str, lines: &[&str]) -> Self {
        NameMatcher::Family {
            prefix: prefix.to_string(),
            lines: lines.iter().map(|line| line.to_string()).collect(),
        }
    }

    /// Returns `Some(selector)` when `name` is recognized
    ///
    /// The selector is `None` for exact matches.
    pub fn matches<'a>(&self, name: &'a str) -> Option<Option<&'a str>> {
        match self {
            NameMatcher::Exact(exact) => (exact == name).then_some(None),
            NameMatcher::Family { prefix, .. } => name
                .strip_prefix(prefix.as_str())
                .filter(|selector| is_line_selector(selector))
                .map(Some),
        }
    }

    /// Names this matcher contributes to the catalog
    pub fn expand(&self) -> Vec<String> {
        match self {
            NameMatcher::Exact(name) => vec![name.clone()],
            NameMatcher::Family { prefix, lines } => lines
                .iter()
                .map(|line| format!("{}{}", prefix, line))
                .collect(),
        }
    }
}

/// Digits, optionally separated by single dots (`22`, `3.13`)
fn is_line_selector(selector: &str) -> bool {
    !selector.is_empty()
        && selector
            .split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

/// What runs once an entry recognizes a name
#[derive(Clone)]
pub enum Source {
    Strategy(Arc<dyn Strategy>),
    /// Recognized but queued for future support; always absent, never fetches
    Unimplemented,
}

#[derive(Clone)]
pub struct Entry {
    pub matcher: NameMatcher,
    pub source: Source,
}

impl Entry {
    pub fn new(matcher: NameMatcher, strategy: impl Strategy + 'static) -> Self {
        Self {
            matcher,
            source: Source::Strategy(Arc::new(strategy)),
        }
    }

    pub fn unimplemented(name: &str) -> Self {
        Self {
            matcher: NameMatcher::exact(name),
            source: Source::Unimplemented,
        }
    }
}

/// Named group of packages sharing one strategy kind
#[derive(Clone)]
pub struct Category {
    name: String,
    entries: Vec<Entry>,
}

impl Category {
    pub fn new(name: &str, entries: Vec<Entry>) -> Self {
        Self {
            name: name.to_string(),
            entries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Finds the entry recognizing `package` together with its selector
    fn find<'a>(&self, package: &'a str) -> Option<(&Entry, Option<&'a str>)> {
        self.entries
            .iter()
            .find_map(|entry| entry.matcher.matches(package).map(|sel| (entry, sel)))
    }

    pub fn recognizes(&self, package: &str) -> bool {
        self.find(package).is_some()
    }

    /// Resolves `package`, or returns `None` to decline it
    pub async fn resolve(&self, fetcher: &dyn Fetcher, package: &str) -> Option<Resolution> {
        let (entry, selector) = self.find(package)?;

        let resolution = match &entry.source {
            Source::Unimplemented => Resolution::Absent(AbsentReason::Unimplemented),
            Source::Strategy(strategy) => strategy.resolve(fetcher, selector).await.into(),
        };

        Some(resolution)
    }
}

/// Ordered list of categories; first match wins
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    categories: Vec<Category>,
}

impl ResolverRegistry {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Returns the category that would resolve `package`, without fetching
    pub fn lookup(&self, package: &str) -> Result<&Category, ResolveError> {
        self.categories
            .iter()
            .find(|category| category.recognizes(package))
            .ok_or_else(|| ResolveError::UnknownPackage(package.to_string()))
    }

    /// Resolves a single package
    ///
    /// Fetch failures, unmatched content and unimplemented entries all come
    /// back as [`Resolution::Absent`]; only an unknown name is an error.
    pub async fn resolve(
        &self,
        fetcher: &dyn Fetcher,
        package: &str,
    ) -> Result<Resolution, ResolveError> {
        for category in &self.categories {
            let Some(resolution) = category.resolve(fetcher, package).await else {
                continue;
            };

            match &resolution {
                Resolution::Found(version) => {
                    debug!("{} [{}]: {}", package, category.name(), version)
                }
                Resolution::Absent(AbsentReason::Unimplemented) => {
                    trace!("{} [{}]: not implemented yet", package, category.name())
                }
                Resolution::Absent(AbsentReason::Strategy(e)) => {
                    debug!("{} [{}]: absent ({})", package, category.name(), e)
                }
            }

            return Ok(resolution);
        }

        Err(ResolveError::UnknownPackage(package.to_string()))
    }
}
