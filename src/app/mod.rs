//! Request handling on top of the catalog and the local registry
//!
//! # Modules
//!
//! - [`error`]: errors surfaced to the command line
//! - [`output`]: rendering of resolutions and version listings
//! - [`resolver`]: resolves requests and lists versions and builds

pub mod error;
pub mod output;
pub mod resolver;
