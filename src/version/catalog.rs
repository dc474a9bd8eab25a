//! Sorted, de-duplicated view of every known release of one family

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::version::error::CatalogError;
use crate::version::ordering::{Version, compare_versions, sort_descending};
use crate::version::types::Family;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    family: Family,
    /// Newest first, no duplicates, never empty
    versions: Vec<String>,
}

impl Catalog {
    /// Build a catalog from a family tag ("nginx" or "openresty").
    pub fn new(family: &str, versions: Vec<String>) -> Result<Self, CatalogError> {
        let family = family.parse::<Family>()?;
        Self::from_family(family, versions)
    }

    /// Build a catalog, dropping duplicates and entries that are not dotted numbers.
    pub fn from_family(family: Family, versions: Vec<String>) -> Result<Self, CatalogError> {
        if versions.is_empty() {
            return Err(CatalogError::EmptyCatalog(family));
        }

        let mut seen = HashSet::new();
        let mut versions: Vec<String> = versions
            .into_iter()
            .filter(|v| {
                if Version::parse(v).is_none() {
                    warn!("Ignoring malformed {} version '{}'", family, v);
                    return false;
                }
                true
            })
            .filter(|v| seen.insert(v.clone()))
            .collect();

        if versions.is_empty() {
            return Err(CatalogError::EmptyCatalog(family));
        }

        sort_descending(&mut versions);
        debug!("Catalog of {} holds {} versions", family, versions.len());

        Ok(Self { family, versions })
    }

    /// Drop every version strictly below `floor`.
    ///
    /// Fails without modifying the catalog if nothing would remain.
    pub fn retain_at_least(&mut self, floor: &str) -> Result<(), CatalogError> {
        if Version::parse(floor).is_none() {
            return Err(CatalogError::InvalidVersion(floor.to_string()));
        }

        let kept: Vec<String> = self
            .versions
            .iter()
            .filter(|v| compare_versions(v, floor).is_ge())
            .cloned()
            .collect();

        if kept.is_empty() {
            return Err(CatalogError::EmptyCatalog(self.family));
        }

        debug!(
            "Dropped {} {} versions below {}",
            self.versions.len() - kept.len(),
            self.family,
            floor
        );
        self.versions = kept;
        Ok(())
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn size(&self) -> usize {
        self.versions.len()
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Newest version in the catalog
    pub fn latest(&self) -> &str {
        // versions is never empty
        &self.versions[0]
    }

    /// Newest version whose leading components equal `prefix`.
    pub fn head_of(&self, prefix: &str) -> Result<&str, CatalogError> {
        self.matching(prefix)
            .next()
            .ok_or_else(|| CatalogError::VersionNotFound(prefix.to_string()))
    }

    /// Every version whose leading components equal `prefix`, newest first.
    pub fn filter_versions(&self, prefix: &str) -> Result<Vec<&str>, CatalogError> {
        let matches: Vec<&str> = self.matching(prefix).collect();
        if matches.is_empty() {
            return Err(CatalogError::VersionNotFound(prefix.to_string()));
        }
        Ok(matches)
    }

    fn matching<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        let prefix = Version::parse(prefix);
        self.versions
            .iter()
            .filter(move |v| match (&prefix, Version::parse(v)) {
                (Some(prefix), Some(version)) => version.starts_with(prefix),
                _ => false,
            })
            .map(String::as_str)
    }
}
