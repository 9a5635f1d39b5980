use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::load::default_state_dir;

/// State remembered between runs. Only the theme choice survives a restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub dark_mode: bool,
}

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed preferences in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// TOML file holding [`Preferences`].
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `MUSICOVA_STATE_PATH`, or `state.toml` in the XDG state directory.
    pub fn locate() -> Option<Self> {
        if let Some(p) = env::var_os("MUSICOVA_STATE_PATH") {
            return Some(Self::new(p));
        }
        default_state_dir().map(|d| Self::new(d.join("state.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read saved preferences. A missing file is not an error.
    pub fn load(&self) -> Result<Option<Preferences>, PreferencesError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PreferencesError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        toml::from_str(&raw)
            .map(Some)
            .map_err(|source| PreferencesError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    pub fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        let io_err = |source: io::Error| PreferencesError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, toml::to_string(prefs)?).map_err(io_err)
    }
}
