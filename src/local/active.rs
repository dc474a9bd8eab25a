//! Detection of the active build
//!
//! `<home>/bin/nginx` is a symlink to `<dist>/<package>/bin/nginx`; the package
//! component names the active build.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::local::error::RegistryError;
use crate::version::naming;

/// Version name of the build `link` points at, or `None` without a link.
pub fn active_build(link: &Path) -> Result<Option<String>, RegistryError> {
    match fs::symlink_metadata(link) {
        Ok(meta) if meta.file_type().is_symlink() => {}
        Ok(_) => return Err(RegistryError::BrokenLink(link.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(RegistryError::Io {
                path: link.to_path_buf(),
                source,
            });
        }
    }

    let target = fs::read_link(link).map_err(|source| RegistryError::Io {
        path: link.to_path_buf(),
        source,
    })?;

    // <package>/bin/nginx
    let package = target
        .parent()
        .and_then(Path::parent)
        .and_then(Path::file_name)
        .ok_or_else(|| RegistryError::BrokenLink(target.clone()))?;

    let name = naming::decode(&package.to_string_lossy())?;
    debug!("{:?} -> {:?} ({})", link, target, name);

    Ok(Some(name))
}
