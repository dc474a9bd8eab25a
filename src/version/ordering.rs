//! Numeric ordering for dot-separated version strings
//!
//! Each component is compared as an integer, so "2.15.1" ranks above "2.8.15".
//! When one version is a strict prefix of the other, the shorter one ranks lower.

use std::cmp::Ordering;
use std::fmt;

/// A parsed version: one non-negative integer per dot-separated component
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    components: Vec<u64>,
}

impl Version {
    /// Parse "1.5.12.1" into [1, 5, 12, 1].
    ///
    /// Returns `None` for empty input and for empty or non-numeric components.
    pub fn parse(version: &str) -> Option<Self> {
        let components = version
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                part.parse::<u64>().ok()
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self { components })
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// True if this version's leading components equal all of `prefix`'s.
    ///
    /// A version with fewer components than `prefix` never matches.
    pub fn starts_with(&self, prefix: &Version) -> bool {
        self.components.starts_with(&prefix.components)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Compare two version strings in ascending order.
///
/// Unparseable strings rank below every valid version. Ties between strings
/// that parse to the same components fall back to string comparison so the
/// order stays total.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let by_components = match (Version::parse(a), Version::parse(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    };
    by_components.then_with(|| a.cmp(b))
}

/// Sort version strings newest first.
pub fn sort_descending(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(b, a));
}
