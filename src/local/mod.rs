//! Builds installed on this machine
//!
//! # Modules
//!
//! - [`active`]: which build the `bin/nginx` symlink points at
//! - [`error`]: errors scanning the installed-packages directory
//! - [`registry`]: installed builds reconstructed from directory names

pub mod active;
pub mod error;
pub mod registry;
