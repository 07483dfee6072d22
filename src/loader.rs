//! Lazy, memoized loading of `gitvoy.config.json`.
//!
//! Loading never fails from the caller's point of view: a missing or broken
//! file yields [`GitvoyConfig::default`], tagged [`ConfigOrigin::Default`] so
//! the fallback stays observable. Only a successful load is cached; the
//! fallback is rebuilt (and the file retried) on every call until one
//! succeeds.

use std::error::Error as _;
use std::fs;
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, warn};
use thiserror::Error;

use crate::config::{GitvoyConfig, CONFIG_FILE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read `{0}`")]
    Io(PathBuf, #[source] io::Error),
    #[error("could not parse `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),
}

impl ConfigError {
    fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::Io(_, err) if err.kind() == io::ErrorKind::NotFound)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Read from disk (now or earlier, from the cache).
    Loaded,
    /// The built-in fallback.
    Default,
}

#[derive(Clone, Debug)]
pub struct LoadedConfig {
    pub config: Arc<GitvoyConfig>,
    pub origin: ConfigOrigin,
}

impl LoadedConfig {
    pub fn is_default(&self) -> bool {
        self.origin == ConfigOrigin::Default
    }
}

impl Deref for LoadedConfig {
    type Target = GitvoyConfig;

    fn deref(&self) -> &GitvoyConfig {
        &self.config
    }
}

pub struct ConfigLoader {
    path: PathBuf,
    // Held across the read so concurrent first calls load once.
    cache: Mutex<Option<Arc<GitvoyConfig>>>,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> ConfigLoader {
        ConfigLoader {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    /// Loader for `gitvoy.config.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> ConfigLoader {
        ConfigLoader::new(dir.join(CONFIG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_config(&self) -> LoadedConfig {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(config) = cache.as_ref() {
            return LoadedConfig {
                config: Arc::clone(config),
                origin: ConfigOrigin::Loaded,
            };
        }

        match read_config(&self.path) {
            Ok(config) => {
                debug!("loaded {}", self.path.display());
                let config = Arc::new(config);
                *cache = Some(Arc::clone(&config));
                LoadedConfig { config, origin: ConfigOrigin::Loaded }
            }
            Err(err) => {
                if err.is_not_found() {
                    debug!("{} not found, using default config", self.path.display());
                } else {
                    warn!("{}, using default config", describe(&err));
                }
                LoadedConfig {
                    config: Arc::new(GitvoyConfig::default()),
                    origin: ConfigOrigin::Default,
                }
            }
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// Read and parse a config file, warning about keys that were ignored.
pub fn read_config(path: &Path) -> Result<GitvoyConfig, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

    let mut ignored = Vec::new();
    let mut deserializer = serde_json::Deserializer::from_str(&content);
    let config: GitvoyConfig =
        serde_ignored::deserialize(&mut deserializer, |field: serde_ignored::Path<'_>| {
            ignored.push(field.to_string());
        })
        .map_err(|err| ConfigError::Json(path.to_path_buf(), err))?;
    deserializer
        .end()
        .map_err(|err| ConfigError::Json(path.to_path_buf(), err))?;

    for field in &ignored {
        warn!("unknown field `{}` in {}", field, path.display());
    }

    Ok(config)
}

fn describe(err: &ConfigError) -> String {
    match err.source() {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    }
}
