use std::path::{Path, PathBuf};

// =============================================================================
// Time-related constants
// =============================================================================

/// Catalog cache expiry in milliseconds (1 day)
pub const CACHE_EXPIRE_MS: u64 = 24 * 60 * 60 * 1000;

// =============================================================================
// Catalog constants
// =============================================================================

/// Oldest nginx release that still builds with the default configure options
pub const DEFAULT_NGINX_FLOOR: &str = "0.5.38";

const HOME_DIR_NAME: &str = "nginxbrew";
const DIST_DIR_NAME: &str = "versions";
const BIN_DIR_NAME: &str = "bin";
const CACHE_DIR_NAME: &str = ".cache";
const LOG_FILE_NAME: &str = "ngxbrew.log";

pub const HOME_ENV: &str = "NGINXBREW_HOME";
pub const CACHE_DIR_ENV: &str = "NGINXBREW_CACHE_DIR";
pub const NGINX_FLOOR_ENV: &str = "NGINXBREW_NGINX_FLOOR";

/// Raw environment values consumed by [`Config::from_env_values`]
#[derive(Debug, Clone, Default)]
pub struct EnvValues {
    pub home: Option<String>,
    pub cache_dir: Option<String>,
    pub nginx_floor: Option<String>,
}

impl EnvValues {
    fn from_process() -> Self {
        Self {
            home: std::env::var(HOME_ENV).ok(),
            cache_dir: std::env::var(CACHE_DIR_ENV).ok(),
            nginx_floor: std::env::var(NGINX_FLOOR_ENV).ok(),
        }
    }
}

/// Paths and tunables handed to the catalog and registry components
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub home_dir: PathBuf,
    /// `None` disables the catalog cache
    pub cache_dir: Option<PathBuf>,
    /// Lowest nginx version kept in the catalog
    pub nginx_floor: Option<String>,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_env_values(EnvValues::from_process(), dirs::home_dir())
    }

    /// Build the configuration from explicit values.
    ///
    /// `NGINXBREW_HOME` wins over `~/nginxbrew`, which wins over `./nginxbrew`.
    /// An empty cache dir or floor disables the feature.
    pub fn from_env_values(env: EnvValues, home_dir: Option<PathBuf>) -> Self {
        let home = env
            .home
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .or_else(|| home_dir.map(|home| home.join(HOME_DIR_NAME)))
            .unwrap_or_else(|| PathBuf::from(".").join(HOME_DIR_NAME));

        let cache_dir = match env.cache_dir {
            Some(dir) if dir.is_empty() => None,
            Some(dir) => Some(PathBuf::from(dir)),
            None => Some(home.join(CACHE_DIR_NAME)),
        };

        let nginx_floor = match env.nginx_floor {
            Some(floor) if floor.is_empty() => None,
            Some(floor) => Some(floor),
            None => Some(DEFAULT_NGINX_FLOOR.to_string()),
        };

        Self {
            home_dir: home,
            cache_dir,
            nginx_floor,
        }
    }

    /// Config rooted at `home` with the default cache location and floor.
    pub fn with_home(home: &Path) -> Self {
        Self::from_env_values(
            EnvValues {
                home: Some(home.to_string_lossy().into_owned()),
                ..Default::default()
            },
            None,
        )
    }

    pub fn without_cache(mut self) -> Self {
        self.cache_dir = None;
        self
    }

    /// Directory holding one subdirectory per installed build
    pub fn dist_dir(&self) -> PathBuf {
        self.home_dir.join(DIST_DIR_NAME)
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.home_dir.join(BIN_DIR_NAME)
    }

    /// Symlink pointing at the active build's nginx binary
    pub fn nginx_bin(&self) -> PathBuf {
        self.bin_dir().join("nginx")
    }

    pub fn log_path(&self) -> PathBuf {
        self.home_dir.join(LOG_FILE_NAME)
    }
}
