use thiserror::Error;

use crate::local::error::RegistryError;
use crate::version::error::{CacheError, CatalogError, LoadError};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}
