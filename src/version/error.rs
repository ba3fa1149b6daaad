use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Empty response from {0}")]
    Empty(String),
}

/// Failure of a single extraction strategy run
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("No version candidates matched")]
    NoCandidate,
}

/// Fatal resolution failure; everything else is normalized to "absent"
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown package: {0}")]
    UnknownPackage(String),
}
