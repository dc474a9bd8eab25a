//! ngxbrew: resolve partial nginx/openresty versions against the upstream
//! release catalog and track which builds are installed locally.
//!
//! # Modules
//!
//! - [`version`]: catalog, ordering, naming convention, remote fetch and cache
//! - [`local`]: filesystem-backed registry of installed builds
//! - [`app`]: request resolution and command output
//! - [`config`]: paths and tunables derived from the environment
//! - [`logging`]: tracing subscriber setup

pub mod app;
pub mod config;
pub mod local;
pub mod logging;
pub mod version;
