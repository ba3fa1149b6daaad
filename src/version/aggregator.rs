//! Batch resolution of many packages
//!
//! Failures of individual packages never affect their siblings: they come
//! back as absent versions. Only an unknown package name aborts the batch,
//! and it does so before anything is fetched.

use std::cmp::Ordering;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info};

use crate::config::DEFAULT_CONCURRENCY;
use crate::version::catalog::PackageCatalog;
use crate::version::compare::natural_cmp;
use crate::version::error::ResolveError;
use crate::version::fetcher::Fetcher;
use crate::version::registry::ResolverRegistry;
use crate::version::types::ResolutionResult;

/// How a batch is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// One package at a time, in catalog order
    Serial,
    /// Bounded parallel resolution, results sorted by package name
    #[default]
    Concurrent,
}

/// Catalog order: natural name order, lexical on ties
fn by_name(a: &str, b: &str) -> Ordering {
    natural_cmp(a, b).then_with(|| a.cmp(b))
}

pub struct Aggregator {
    registry: Arc<ResolverRegistry>,
    fetcher: Arc<dyn Fetcher>,
    concurrency: usize,
}

impl Aggregator {
    pub fn new(registry: Arc<ResolverRegistry>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            registry,
            fetcher,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Caps the number of packages resolved at the same time (at least one)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn catalog(&self) -> PackageCatalog {
        PackageCatalog::from_registry(&self.registry)
    }

    /// Rejects the batch if any name is unknown
    fn validate(&self, packages: &[String]) -> Result<(), ResolveError> {
        for package in packages {
            self.registry.lookup(package)?;
        }
        Ok(())
    }

    pub async fn resolve(
        &self,
        packages: &[String],
        mode: Mode,
    ) -> Result<Vec<ResolutionResult>, ResolveError> {
        match mode {
            Mode::Serial => self.resolve_serial(packages).await,
            Mode::Concurrent => self.resolve_concurrent(packages).await,
        }
    }

    /// Resolves every package in the catalog
    pub async fn resolve_all(&self, mode: Mode) -> Result<Vec<ResolutionResult>, ResolveError> {
        let packages = self.catalog().names();
        info!("Resolving all {} known packages", packages.len());
        self.resolve(&packages, mode).await
    }

    /// Resolves packages one at a time, in catalog order
    pub async fn resolve_serial(
        &self,
        packages: &[String],
    ) -> Result<Vec<ResolutionResult>, ResolveError> {
        self.validate(packages)?;

        let mut ordered: Vec<&String> = packages.iter().collect();
        ordered.sort_by(|a, b| by_name(a, b));

        let mut results = Vec::with_capacity(ordered.len());
        for package in ordered {
            let resolution = self.registry.resolve(&*self.fetcher, package).await?;
            results.push(ResolutionResult::new(package, resolution.into_version()));
        }
        Ok(results)
    }

    /// Resolves packages in parallel and returns them sorted by name
    ///
    /// Each package runs in its own task so a panicking strategy only
    /// affects that package. At most `concurrency` tasks are in flight.
    pub async fn resolve_concurrent(
        &self,
        packages: &[String],
    ) -> Result<Vec<ResolutionResult>, ResolveError> {
        self.validate(packages)?;

        debug!(
            "Resolving {} packages with concurrency {}",
            packages.len(),
            self.concurrency
        );

        let tasks = packages.iter().cloned().map(|package| {
            let registry = Arc::clone(&self.registry);
            let fetcher = Arc::clone(&self.fetcher);
            async move {
                let handle = tokio::spawn({
                    let package = package.clone();
                    async move { registry.resolve(&*fetcher, &package).await }
                });

                match handle.await {
                    Ok(Ok(resolution)) => {
                        Ok(ResolutionResult::new(package, resolution.into_version()))
                    }
                    Ok(Err(e)) => Err(e),
                    Err(e) => {
                        error!("Resolution task for {} failed: {}", package, e);
                        Ok(ResolutionResult::new(package, None))
                    }
                }
            }
        });

        let mut results = stream::iter(tasks)
            .buffer_unordered(self.concurrency)
            .collect::<Vec<Result<ResolutionResult, ResolveError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        results.sort_by(|a, b| by_name(&a.package, &b.package));

        let found = results.iter().filter(|r| !r.is_absent()).count();
        info!("Resolved {}/{} packages", found, results.len());

        Ok(results)
    }

    /// Catalog-diff: known packages that currently resolve to nothing
    pub async fn missing(&self) -> Result<Vec<String>, ResolveError> {
        let results = self.resolve_all(Mode::Concurrent).await?;

        Ok(results
            .into_iter()
            .filter(ResolutionResult::is_absent)
            .map(|result| result.package)
            .collect())
    }
}
