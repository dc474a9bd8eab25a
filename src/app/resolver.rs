//! Resolution of user requests against the catalog and the installed builds
//!
//! A request such as "openresty-1.9" is split by the naming convention, the
//! family's catalog resolves the partial version to its newest release, and the
//! local registry reports whether that release is installed.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::app::error::ResolveError;
use crate::config::Config;
use crate::local::active::active_build;
use crate::local::registry::LocalRegistry;
use crate::version::cache::CatalogCache;
use crate::version::error::CatalogError;
use crate::version::fetcher::CatalogFetcher;
use crate::version::naming;
use crate::version::types::{Family, InstalledBuild};

/// Outcome of resolving one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Request exactly as given (e.g. "openresty-1.9")
    pub requested: String,
    /// Newest matching release (e.g. "1.9.7.4")
    pub raw_version: String,
    pub family: Family,
    /// Directory name the build is installed under
    pub package_name: String,
    pub download_url: String,
    pub installed: bool,
}

/// An installed build and whether it is the active one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedBuild {
    pub build: InstalledBuild,
    pub active: bool,
}

pub struct VersionResolver {
    cache: CatalogCache,
    registry: LocalRegistry,
    nginx_bin: PathBuf,
}

impl VersionResolver {
    pub fn new(config: &Config, fetcher: Arc<dyn CatalogFetcher>) -> Self {
        Self {
            cache: CatalogCache::new(
                fetcher,
                config.cache_dir.clone(),
                config.nginx_floor.clone(),
            ),
            registry: LocalRegistry::new(config.dist_dir()),
            nginx_bin: config.nginx_bin(),
        }
    }

    pub fn registry(&self) -> &LocalRegistry {
        &self.registry
    }

    /// Resolve a possibly partial request to the newest matching release.
    pub async fn resolve(&self, request: &str) -> Result<Resolution, ResolveError> {
        let (raw_version, family) = naming::resolve(request);
        let catalog = self.cache.load(family).await?;

        let raw_version = catalog
            .head_of(&raw_version)
            .map_err(|e| match e {
                CatalogError::VersionNotFound(_) => {
                    CatalogError::VersionNotFound(request.to_string())
                }
                other => other,
            })?
            .to_string();

        let package_name = naming::encode(&raw_version, family);
        let installed = self.registry.exists(&raw_version, family)?;
        info!(
            "resolved {} to {} ({}, installed: {})",
            request, raw_version, package_name, installed
        );

        Ok(Resolution {
            requested: request.to_string(),
            download_url: naming::download_url(&raw_version, family),
            raw_version,
            family,
            package_name,
            installed,
        })
    }

    /// Known releases of `family`, optionally restricted to a version prefix.
    pub async fn versions(
        &self,
        family: Family,
        head: Option<&str>,
    ) -> Result<Vec<String>, ResolveError> {
        let catalog = self.cache.load(family).await?;
        let versions = match head {
            Some(prefix) => catalog
                .filter_versions(prefix)?
                .into_iter()
                .map(str::to_string)
                .collect(),
            None => catalog.versions().to_vec(),
        };
        Ok(versions)
    }

    /// Installed builds, flagging the one `bin/nginx` links to.
    pub fn installed(&self) -> Result<Vec<ListedBuild>, ResolveError> {
        let active = active_build(&self.nginx_bin)?;
        let builds = self
            .registry
            .installed()?
            .into_values()
            .map(|build| ListedBuild {
                active: active.as_deref().is_some_and(|name| build.is(name)),
                build,
            })
            .collect();
        Ok(builds)
    }

    /// Drop the cached catalog of `family` so the next load refetches it.
    pub fn refresh(&self, family: Family) -> Result<(), ResolveError> {
        self.cache.invalidate(family)?;
        Ok(())
    }
}
