//! Shared test utilities

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use upstream_version::version::error::FetchError;
use upstream_version::version::fetcher::Fetcher;
use upstream_version::version::registry::{Category, Entry, NameMatcher};
use upstream_version::version::strategies::ListingStrategy;

/// In-memory fetcher with per-URL latency
///
/// Unknown URLs answer with a 404 status error.
#[derive(Default)]
pub struct StubFetcher {
    responses: HashMap<String, (Duration, Vec<u8>)>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: &str, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), (Duration::ZERO, body.as_bytes().to_vec()));
        self
    }

    pub fn with_delayed_response(mut self, url: &str, delay_ms: u64, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            (Duration::from_millis(delay_ms), body.as_bytes().to_vec()),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// URLs in the order their responses completed
    pub fn completed(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let Some((delay, body)) = self.responses.get(url) else {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            });
        };

        tokio::time::sleep(*delay).await;
        self.requested.lock().unwrap().push(url.to_string());
        Ok(body.clone())
    }
}

pub fn mirror_url(name: &str) -> String {
    format!("https://mirror.test/{}/", name)
}

/// A listing entry reading `<name>-<version>.tar.gz` links from the test mirror
pub fn mirror_entry(name: &str) -> Entry {
    Entry::new(
        NameMatcher::exact(name),
        ListingStrategy::new(&mirror_url(name), &format!("{}-", name), ".tar.gz"),
    )
}

pub fn mirror_category(names: &[&str]) -> Category {
    Category::new("mirror", names.iter().map(|name| mirror_entry(name)).collect())
}

pub fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
