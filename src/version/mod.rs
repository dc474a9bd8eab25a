//! Upstream release catalog and version resolution
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Fetcher   │────▶│    Cache    │────▶│   Catalog   │
//! │ (HTML page) │     │ (TTL file)  │     │ (head_of)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │   Naming    │     │  Ordering   │
//!                     │ (ngx-<ver>) │     │(numeric cmp)│
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: per-family catalog cache expiring by file mtime
//! - [`catalog`]: sorted, de-duplicated versions with prefix resolution
//! - [`error`]: error types for every layer
//! - [`fetcher`]: download-page scraper behind the `CatalogFetcher` trait
//! - [`naming`]: package directory naming convention
//! - [`ordering`]: numeric comparison of dotted versions
//! - [`types`]: `Family` and `InstalledBuild`

pub mod cache;
pub mod catalog;
pub mod error;
pub mod fetcher;
pub mod naming;
pub mod ordering;
pub mod types;
