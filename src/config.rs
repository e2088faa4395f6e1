//! Remembers the last net-list file between runs.
//!
//! ```toml
//! [configuration]
//! netlist_file = "/work/board/allegro/pstxnet.dat"
//!
//! [info]
//! description = "Configuration file to Format Cadence Allegro net-list file"
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = ".cnl_format.toml";

const DESCRIPTION: &str = "Configuration file to Format Cadence Allegro net-list file";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub configuration: Configuration,
    pub info: Info,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub netlist_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Info {
    pub description: String,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            description: DESCRIPTION.to_owned(),
        }
    }
}

impl Config {
    /// Load the config, falling back to defaults if it is missing or unreadable
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                warn!("Cannot read config file '{}': {}", path.display(), err);
                return Self::default();
            }
        };
        Self::from_toml(&text).unwrap_or_else(|err| {
            warn!("Ignoring config file '{}': {}", path.display(), err);
            Self::default()
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml::to_string(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let text = self.to_toml()?;
        fs::write(path, text).map_err(|e| Error::io(path, e))
    }

    /// The remembered net-list, if any
    pub fn netlist_file(&self) -> Option<&Path> {
        let file = self.configuration.netlist_file.as_str();
        (!file.is_empty()).then(|| Path::new(file))
    }

    pub fn set_netlist_file(&mut self, path: &Path) {
        self.configuration.netlist_file = path.display().to_string();
    }
}
