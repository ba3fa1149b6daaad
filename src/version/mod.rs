//! Version resolution engine
//!
//! This module provides the core functionality for fetching upstream content,
//! caching it, extracting version candidates and picking the latest one for
//! every package in the catalog.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Aggregator  │────▶│  Registry   │────▶│  Strategy   │────▶│   Fetcher   │
//! │  (batch)    │     │ (dispatch)  │     │  (extract)  │     │   (HTTP)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │                   │
//!                                                ▼                   ▼
//!                                         ┌─────────────┐     ┌─────────────┐
//!                                         │  Compare    │     │    Cache    │
//!                                         │ (natural)   │     │   (files)   │
//!                                         └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`aggregator`]: Serial and bounded-concurrent batch resolution, catalog-diff
//! - [`builtin`]: The statically declared package catalog
//! - [`cache`]: File-per-URL response cache with TTL
//! - [`catalog`]: Enumeration of all known package names
//! - [`compare`]: Natural version ordering
//! - [`error`]: Error types for cache, fetch, strategy and resolution
//! - [`fetcher`]: Cached HTTP fetching
//! - [`filter`]: Pre-release and platform build exclusion rules
//! - [`registry`]: Category dispatch from package names to strategies
//! - [`strategy`]: Strategy trait shared by all upstream shapes
//! - [`strategies`]: Tag API, git refs, listing, page phrase and release-family strategies
//! - [`types`]: Resolution outcomes and results

pub mod aggregator;
pub mod builtin;
pub mod cache;
pub mod catalog;
pub mod compare;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod registry;
pub mod strategies;
pub mod strategy;
pub mod types;
