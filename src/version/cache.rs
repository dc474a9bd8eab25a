use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::CACHE_EXPIRE_MS;
use crate::version::catalog::Catalog;
use crate::version::error::{CacheError, CatalogError, LoadError};
use crate::version::fetcher::{CatalogFetcher, apply_floor, fetch_unfiltered};
use crate::version::types::Family;

/// Bumped whenever the on-disk snapshot layout changes.
///
/// Version 1 stored catalogs with the nginx floor already applied.
pub const SCHEMA_VERSION: u32 = 2;

const CATALOG_DIR_NAME: &str = "catalog";

/// On-disk form of a cached catalog
#[derive(Debug, Serialize, Deserialize)]
struct CatalogSnapshot {
    schema_version: u32,
    family: Family,
    /// Milliseconds since UNIX epoch
    created_at: i64,
    versions: Vec<String>,
}

/// Read-through cache of fetched catalogs, one file per family.
///
/// Entries expire by file mtime. Unreadable entries are deleted and refetched.
pub struct CatalogCache {
    fetcher: Arc<dyn CatalogFetcher>,
    cache_dir: Option<PathBuf>,
    expiry: Duration,
    nginx_floor: Option<String>,
}

impl CatalogCache {
    /// `cache_dir` of `None` disables caching: every load fetches.
    pub fn new(
        fetcher: Arc<dyn CatalogFetcher>,
        cache_dir: Option<PathBuf>,
        nginx_floor: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            cache_dir,
            expiry: Duration::from_millis(CACHE_EXPIRE_MS),
            nginx_floor,
        }
    }

    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    /// Path of the cache file for `family`, if caching is enabled
    pub fn cache_file(&self, family: Family) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| {
            dir.join(CATALOG_DIR_NAME)
                .join(format!("{}.json", family.cache_key()))
        })
    }

    /// Return the catalog of `family`, from cache when fresh.
    ///
    /// The cache holds the catalog as fetched. The nginx floor is applied on
    /// every load, cached or not.
    pub async fn load(&self, family: Family) -> Result<Catalog, LoadError> {
        let catalog = self.load_unfiltered(family).await?;
        Ok(apply_floor(catalog, self.nginx_floor.as_deref())?)
    }

    async fn load_unfiltered(&self, family: Family) -> Result<Catalog, LoadError> {
        let Some(cache_file) = self.cache_file(family) else {
            return fetch_unfiltered(self.fetcher.as_ref(), family).await;
        };

        if let Some(catalog) = self.read_fresh(&cache_file, family) {
            return Ok(catalog);
        }

        let catalog = fetch_unfiltered(self.fetcher.as_ref(), family).await?;

        match write_snapshot(&cache_file, &catalog) {
            Ok(()) => debug!("Cache saved to {:?}", cache_file),
            Err(e) => warn!("Failed to save cache {:?}: {}", cache_file, e),
        }

        Ok(catalog)
    }

    /// Delete the cached catalog of `family`, if any.
    pub fn invalidate(&self, family: Family) -> Result<(), CacheError> {
        let Some(cache_file) = self.cache_file(family) else {
            return Ok(());
        };

        match fs::remove_file(&cache_file) {
            Ok(()) => {
                info!("Removed cache {:?}", cache_file);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the cache file if it exists and has not expired.
    ///
    /// Expired and corrupt files are removed.
    fn read_fresh(&self, cache_file: &Path, family: Family) -> Option<Catalog> {
        let modified = fs::metadata(cache_file).and_then(|m| m.modified()).ok()?;

        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);

        if age >= self.expiry {
            debug!("Cache file {:?} expired ({:?} old)", cache_file, age);
            remove_quietly(cache_file);
            return None;
        }

        debug!("Cache file: {:?}", cache_file);
        match read_snapshot(cache_file, family) {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                error!("{}", e);
                remove_quietly(cache_file);
                error!("{:?} removed", cache_file);
                None
            }
        }
    }
}

fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn read_snapshot(cache_file: &Path, family: Family) -> Result<Catalog, CacheError> {
    let bytes = fs::read(cache_file)?;
    let snapshot: CatalogSnapshot = serde_json::from_slice(&bytes)?;

    if snapshot.schema_version != SCHEMA_VERSION {
        return Err(CacheError::SchemaMismatch {
            found: snapshot.schema_version,
            expected: SCHEMA_VERSION,
        });
    }

    if snapshot.family != family {
        return Err(CacheError::Corrupt(CatalogError::InvalidFamily(
            snapshot.family.to_string(),
        )));
    }

    debug!(
        "Loaded {} {} versions cached at {}",
        snapshot.versions.len(),
        family,
        snapshot.created_at
    );

    Ok(Catalog::from_family(snapshot.family, snapshot.versions)?)
}

fn write_snapshot(cache_file: &Path, catalog: &Catalog) -> Result<(), CacheError> {
    if let Some(dir) = cache_file.parent() {
        fs::create_dir_all(dir)?;
    }

    let snapshot = CatalogSnapshot {
        schema_version: SCHEMA_VERSION,
        family: catalog.family(),
        created_at: current_timestamp_ms(),
        versions: catalog.versions().to_vec(),
    };

    fs::write(cache_file, serde_json::to_vec(&snapshot)?)?;
    Ok(())
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("Failed to remove {:?}: {}", path, e);
    }
}
