//! Installed builds, reconstructed from the installed-packages directory
//!
//! Nothing is persisted: every query rescans the directory. Subdirectories whose
//! names do not follow the package naming convention are skipped with a warning.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::local::error::RegistryError;
use crate::version::naming;
use crate::version::ordering::compare_versions;
use crate::version::types::{Family, InstalledBuild};

pub struct LocalRegistry {
    root: PathBuf,
}

impl LocalRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Installed builds keyed by version name, nginx first, newest first.
    ///
    /// A missing root directory yields an empty map.
    pub fn installed(&self) -> Result<IndexMap<String, InstalledBuild>, RegistryError> {
        let mut builds = self.scan()?;
        builds.sort_by(|a, b| {
            a.family
                .cmp(&b.family)
                .then_with(|| compare_versions(&b.raw_version, &a.raw_version))
        });

        Ok(builds
            .into_iter()
            .map(|build| (build.name.clone(), build))
            .collect())
    }

    /// Installed build of `raw_version` in `family`, if present
    pub fn find(
        &self,
        raw_version: &str,
        family: Family,
    ) -> Result<Option<InstalledBuild>, RegistryError> {
        Ok(self
            .scan()?
            .into_iter()
            .find(|b| b.raw_version == raw_version && b.family == family))
    }

    pub fn exists(&self, raw_version: &str, family: Family) -> Result<bool, RegistryError> {
        Ok(self.find(raw_version, family)?.is_some())
    }

    pub fn count(&self) -> Result<usize, RegistryError> {
        Ok(self.scan()?.len())
    }

    /// True right after the first install, which then becomes the active build
    pub fn has_exactly_one_build(&self) -> Result<bool, RegistryError> {
        Ok(self.count()? == 1)
    }

    fn scan(&self) -> Result<Vec<InstalledBuild>, RegistryError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{:?} does not exist, no builds installed", self.root);
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(RegistryError::Io {
                    path: self.root.clone(),
                    source,
                });
            }
        };

        let mut builds = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| RegistryError::Io {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();

            if !path.is_dir() {
                continue;
            }

            let dir_name = entry.file_name().to_string_lossy().into_owned();
            match naming::decode_build(&dir_name) {
                Ok(build) => {
                    debug!(
                        "built package: {:?} -> {}, {}",
                        path, build.family, build.raw_version
                    );
                    builds.push(build);
                }
                Err(e) => warn!("Skipping {:?}: {}", path, e),
            }
        }

        Ok(builds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry_with(dirs: &[&str]) -> (TempDir, LocalRegistry) {
        let temp_dir = TempDir::new().unwrap();
        for dir in dirs {
            fs::create_dir_all(temp_dir.path().join(dir)).unwrap();
        }
        let registry = LocalRegistry::new(temp_dir.path());
        (temp_dir, registry)
    }

    #[test]
    fn missing_root_has_no_builds() {
        let temp_dir = TempDir::new().unwrap();
        let registry = LocalRegistry::new(temp_dir.path().join("versions"));

        assert!(registry.installed().unwrap().is_empty());
        assert_eq!(registry.count().unwrap(), 0);
        assert!(!registry.has_exactly_one_build().unwrap());
    }

    #[test]
    fn single_package_is_exactly_one_build() {
        let (_temp_dir, registry) = registry_with(&["ngx-1.9.9"]);

        assert_eq!(registry.count().unwrap(), 1);
        assert!(registry.has_exactly_one_build().unwrap());
    }

    #[test]
    fn installed_decodes_both_families_in_order() {
        let (_temp_dir, registry) = registry_with(&[
            "ngx-1.8.0",
            "ngx-openresty-1.9.7.4",
            "ngx-1.10.1",
            "ngx-openresty-1.9.7.1",
        ]);

        let installed = registry.installed().unwrap();

        let names: Vec<&str> = installed.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "1.10.1",
                "1.8.0",
                "openresty-1.9.7.4",
                "openresty-1.9.7.1"
            ]
        );
        assert_eq!(
            installed["openresty-1.9.7.4"],
            InstalledBuild {
                raw_version: "1.9.7.4".to_string(),
                family: Family::Openresty,
                name: "openresty-1.9.7.4".to_string(),
            }
        );
    }

    #[test]
    fn malformed_directory_names_are_skipped() {
        let (_temp_dir, registry) =
            registry_with(&["ngx-1.9.9", "INVALID-1.1.1", "tmp", "ngx-openresty-"]);

        let installed = registry.installed().unwrap();

        assert_eq!(installed.len(), 1);
        assert!(installed.contains_key("1.9.9"));
    }

    #[test]
    fn plain_files_are_ignored() {
        let (temp_dir, registry) = registry_with(&["ngx-1.9.9"]);
        fs::write(temp_dir.path().join("ngx-1.8.0"), "").unwrap();

        assert_eq!(registry.count().unwrap(), 1);
    }

    #[test]
    fn exists_matches_version_and_family() {
        let (_temp_dir, registry) = registry_with(&["ngx-1.9.9", "ngx-openresty-1.9.7.4"]);

        assert!(registry.exists("1.9.9", Family::Nginx).unwrap());
        assert!(registry.exists("1.9.7.4", Family::Openresty).unwrap());
        assert!(!registry.exists("1.9.9", Family::Openresty).unwrap());
        assert!(!registry.exists("1.9.7.4", Family::Nginx).unwrap());
        assert!(!registry.exists("1.9", Family::Nginx).unwrap());
    }

    #[test]
    fn find_returns_matching_build() {
        let (_temp_dir, registry) = registry_with(&["ngx-openresty-1.9.7.4"]);

        let build = registry.find("1.9.7.4", Family::Openresty).unwrap().unwrap();

        assert!(build.is("openresty-1.9.7.4"));
    }

    #[test]
    fn scan_reflects_filesystem_changes() {
        let (temp_dir, registry) = registry_with(&["ngx-1.9.9"]);
        assert!(registry.has_exactly_one_build().unwrap());

        fs::create_dir(temp_dir.path().join("ngx-1.8.0")).unwrap();

        assert_eq!(registry.count().unwrap(), 2);
        assert!(!registry.has_exactly_one_build().unwrap());
    }
}
