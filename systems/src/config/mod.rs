//! File-backed configuration. Values are grouped in sections and stored as TOML:
//!
//! ```toml
//! [Config]
//! FlapRetractSpeedKts = 80.0
//! ```
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt, fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigKey {
    pub section: &'static str,
    pub name: &'static str,
}
impl ConfigKey {
    pub const fn new(section: &'static str, name: &'static str) -> Self {
        Self { section, name }
    }
}
impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.name)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file {0} not found")]
    FileNotFound(PathBuf),
    #[error("configuration key {0} not found")]
    NotFound(ConfigKey),
    #[error("failed to access configuration file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),
}

/// Loads and saves the threshold value by key.
pub trait ConfigStore {
    fn load_threshold(&self, key: ConfigKey) -> Result<f64, ConfigError>;
    fn save_threshold(&mut self, key: ConfigKey, value: f64);
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
struct ConfigDocument {
    sections: BTreeMap<String, BTreeMap<String, f64>>,
}

pub struct TomlConfigStore {
    path: PathBuf,
    document: ConfigDocument,
}
impl TomlConfigStore {
    /// Creates an empty store which will be saved to the given path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_owned(),
            document: ConfigDocument::default(),
        }
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::FileNotFound(path.to_owned())
            } else {
                ConfigError::Io {
                    path: path.to_owned(),
                    source,
                }
            }
        })?;

        let document = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;

        Ok(Self {
            path: path.to_owned(),
            document,
        })
    }

    pub fn save_file(&self) -> Result<(), ConfigError> {
        let contents = toml::to_string(&self.document)?;

        fs::write(&self.path, contents).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_f64(&self, key: ConfigKey) -> Option<f64> {
        self.document
            .sections
            .get(key.section)
            .and_then(|section| section.get(key.name))
            .copied()
    }

    pub fn set_f64(&mut self, key: ConfigKey, value: f64) {
        self.document
            .sections
            .entry(key.section.to_owned())
            .or_default()
            .insert(key.name.to_owned(), value);
    }

    /// Sets the value only when the key isn't present yet. Returns whether it was set.
    pub fn seed_f64(&mut self, key: ConfigKey, value: f64) -> bool {
        if self.get_f64(key).is_none() {
            self.set_f64(key, value);
            true
        } else {
            false
        }
    }
}
impl ConfigStore for TomlConfigStore {
    fn load_threshold(&self, key: ConfigKey) -> Result<f64, ConfigError> {
        self.get_f64(key).ok_or(ConfigError::NotFound(key))
    }

    fn save_threshold(&mut self, key: ConfigKey, value: f64) {
        self.set_f64(key, value);
    }
}
