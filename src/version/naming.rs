//! On-disk naming of installed builds
//!
//! Packages live in `<dist>/ngx-<raw>` for nginx and `<dist>/ngx-openresty-<raw>`
//! for openresty. Every component that builds or reads those names goes through
//! this module.

use crate::version::error::NameFormatError;
use crate::version::ordering::compare_versions;
use crate::version::types::{Family, InstalledBuild};

/// Prefix of every installed package directory
pub const PACKAGE_PREFIX: &str = "ngx-";

/// Marker distinguishing openresty versions and packages
pub const OPENRESTY_MARKER: &str = "openresty-";

const NGINX_DOWNLOAD_URL: &str = "http://nginx.org/download";
const OPENRESTY_DOWNLOAD_URL: &str = "http://openresty.org/download";

/// First openresty release published as `openresty-*` instead of `ngx_openresty-*`
const OPENRESTY_RENAMED_IN: &str = "1.9.7.3";

/// Split a user request into its raw version and family.
///
/// "openresty-1.9" -> ("1.9", Openresty), "1.9" -> ("1.9", Nginx).
/// The remainder is not validated.
pub fn resolve(input: &str) -> (String, Family) {
    match input.strip_prefix(OPENRESTY_MARKER) {
        Some(raw) => (raw.to_string(), Family::Openresty),
        None => (input.to_string(), Family::Nginx),
    }
}

/// Version name including the family marker, as shown to users.
pub fn version_name(raw_version: &str, family: Family) -> String {
    match family {
        Family::Nginx => raw_version.to_string(),
        Family::Openresty => format!("{}{}", OPENRESTY_MARKER, raw_version),
    }
}

/// Package directory name for a build.
pub fn encode(raw_version: &str, family: Family) -> String {
    format!("{}{}", PACKAGE_PREFIX, version_name(raw_version, family))
}

/// Version name (with family marker) encoded in a package directory name.
///
/// Fails when nothing is left after the prefix and the family marker.
pub fn decode(package_name: &str) -> Result<String, NameFormatError> {
    package_name
        .strip_prefix(PACKAGE_PREFIX)
        .map(str::trim)
        .filter(|rest| !resolve(rest).0.is_empty())
        .map(str::to_string)
        .ok_or_else(|| NameFormatError(package_name.to_string()))
}

/// Decode a package directory name into the build it holds.
pub fn decode_build(package_name: &str) -> Result<InstalledBuild, NameFormatError> {
    let name = decode(package_name)?;
    let (raw_version, family) = resolve(&name);
    Ok(InstalledBuild {
        raw_version,
        family,
        name,
    })
}

/// Name of the extracted upstream source tree.
///
/// openresty bundles before 1.9.7.3 were published as `ngx_openresty-*`.
pub fn source_name(raw_version: &str, family: Family) -> String {
    match family {
        Family::Nginx => format!("nginx-{}", raw_version),
        Family::Openresty if compare_versions(raw_version, OPENRESTY_RENAMED_IN).is_lt() => {
            format!("ngx_{}{}", OPENRESTY_MARKER, raw_version)
        }
        Family::Openresty => format!("{}{}", OPENRESTY_MARKER, raw_version),
    }
}

pub fn tarball_name(raw_version: &str, family: Family) -> String {
    format!("{}.tar.gz", source_name(raw_version, family))
}

/// Upstream URL of the source archive for a build.
pub fn download_url(raw_version: &str, family: Family) -> String {
    let base = match family {
        Family::Nginx => NGINX_DOWNLOAD_URL,
        Family::Openresty => OPENRESTY_DOWNLOAD_URL,
    };
    format!("{}/{}", base, tarball_name(raw_version, family))
}
