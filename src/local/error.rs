use std::path::PathBuf;

use thiserror::Error;

use crate::version::error::NameFormatError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    NameFormat(#[from] NameFormatError),

    #[error("{0:?} does not point into an installed package")]
    BrokenLink(PathBuf),
}
