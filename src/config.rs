//! Waybill configuration.
//!
//! Loaded from `~/.waybill/config.toml`. A missing file means defaults;
//! a malformed one is an error.

use std::path::PathBuf;
use std::{fs, io};

use serde::Deserialize;

/// Waybill configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Where the database lives. Defaults to `~/.waybill/data/`.
    pub data_dir: Option<PathBuf>,

    /// Whether recorded tracking events are dispatched to the
    /// notification collaborator.
    pub notifications: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            notifications: true,
        }
    }
}

impl Config {
    /// Load config from `~/.waybill/config.toml`.
    pub fn load() -> Result<Self, String> {
        let Some(path) = Self::path() else {
            return Ok(Self::default());
        };

        let contents = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.waybill/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".waybill").join("config.toml"))
    }
}
