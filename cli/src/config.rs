//! Configuration loading from warden.toml.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use warden_contracts::error::{AclError, AclResult};

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "warden.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub journal: JournalConfig,
}

/// Where the record store snapshot lives.
#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Where the change journal lives.
#[derive(Debug, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_journal_path")]
    pub path: PathBuf,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            path: default_journal_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("warden-store.json")
}

fn default_journal_path() -> PathBuf {
    PathBuf::from("warden-journal.json")
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> AclResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AclError::ConfigError {
            reason: format!("failed to read config '{}': {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml: &str) -> AclResult<Self> {
        toml::from_str(toml).map_err(|e| AclError::ConfigError {
            reason: format!("failed to parse config: {}", e),
        })
    }

    /// Load `explicit` if given (it must exist), else `warden.toml` if
    /// present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> AclResult<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load(Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }
}
