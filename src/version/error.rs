use thiserror::Error;

use crate::version::types::Family;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid family: {0}")]
    InvalidFamily(String),

    #[error("No versions of {0}")]
    EmptyCatalog(Family),

    #[error("version '{0}' is not found in all versions of nginxes/openresties")]
    VersionNotFound(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),
}

#[derive(Debug, Error)]
#[error("Invalid version name '{0}'")]
pub struct NameFormatError(pub String);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch {url}: unexpected status {status}")]
    UnexpectedStatus { url: String, status: u16 },
}

/// Errors reading or writing a cached catalog.
///
/// These never reach callers of `CatalogCache::load`: a bad entry is deleted
/// and refetched.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache schema version {found} does not match {expected}")]
    SchemaMismatch { found: u32, expected: u32 },

    #[error("Cached catalog is invalid: {0}")]
    Corrupt(#[from] CatalogError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
