//! Plain-text rendering of command results

use std::io::{self, Write};

use crate::app::resolver::{ListedBuild, Resolution};
use crate::version::types::Family;

pub fn write_resolution(out: &mut impl Write, resolution: &Resolution) -> io::Result<()> {
    writeln!(
        out,
        "resolved version: [{}-]{}",
        resolution.family, resolution.raw_version
    )?;
    writeln!(out, "nginx package: {}", resolution.package_name)?;
    writeln!(out, "source: {}", resolution.download_url)?;
    if resolution.installed {
        writeln!(out, "{} is already installed", resolution.package_name)?;
    }
    Ok(())
}

pub fn write_versions(out: &mut impl Write, family: Family, versions: &[String]) -> io::Result<()> {
    for version in versions {
        writeln!(out, "[{}-]{}", family, version)?;
    }
    Ok(())
}

/// One line per build, the active one marked with `*`.
pub fn write_installed(out: &mut impl Write, builds: &[ListedBuild]) -> io::Result<()> {
    for listed in builds {
        let marker = if listed.active { "*" } else { " " };
        writeln!(out, "{} {}", marker, listed.build.name)?;
    }
    Ok(())
}
