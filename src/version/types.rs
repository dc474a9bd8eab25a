//! Common types shared by the catalog and the local registry

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::error::CatalogError;

/// Upstream release line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// nginx.org releases (primary family)
    Nginx,
    /// openresty.org bundles (alternate family)
    Openresty,
}

impl Family {
    /// Returns the string representation of the family
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Nginx => "nginx",
            Family::Openresty => "openresty",
        }
    }

    /// Key the catalog of this family is cached under
    pub fn cache_key(&self) -> &'static str {
        match self {
            Family::Nginx => "nginxes",
            Family::Openresty => "openresties",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Family {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nginx" => Ok(Family::Nginx),
            "openresty" => Ok(Family::Openresty),
            _ => Err(CatalogError::InvalidFamily(s.to_string())),
        }
    }
}

/// A build found in the installed-packages directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledBuild {
    /// Dotted version without family marker (e.g. "1.9.7.4")
    pub raw_version: String,
    pub family: Family,
    /// Version name including the family marker (e.g. "openresty-1.9.7.4")
    pub name: String,
}

impl InstalledBuild {
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}
