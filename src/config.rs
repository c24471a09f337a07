//! `ElderConnect` configuration.
//!
//! Loaded from `~/.elderconnect/config.toml`. A missing file means defaults.

use std::path::{Path, PathBuf};
use std::{fs, io};

use serde::{Deserialize, Serialize};

use crate::storage::Storage;

/// `ElderConnect` configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// The default volunteer records are kept under.
    /// Used when neither `--as` nor `ELDERCONNECT_VOLUNTEER` is set.
    pub volunteer: Option<String>,

    /// Override for the store location.
    pub store: Option<PathBuf>,
}

impl Config {
    /// Load config from `~/.elderconnect/config.toml`.
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self, String> {
        let path = Self::path().ok_or("could not determine home directory")?;
        Self::load_from(&path)
    }

    fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.elderconnect/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".elderconnect").join("config.toml"))
    }

    /// The store path: the configured override, else the default location.
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store.clone().or_else(Storage::default_path)
    }
}
