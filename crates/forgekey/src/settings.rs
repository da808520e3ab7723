//! Persistent settings.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use forgekey_api::ApiConfig;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the database location.
pub const DATABASE_ENV: &str = "FORGEKEY_DB";

/// Application settings read from `settings.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Account database location; defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    /// API client settings.
    pub api: ApiConfig,
}

impl Settings {
    /// Load settings from the platform config directory.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir().join("settings.json"))
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Where the account database lives.
    ///
    /// `FORGEKEY_DB` wins over the settings file, which wins over the
    /// platform data directory.
    pub fn database_path(&self) -> PathBuf {
        self.database_path_with(std::env::var_os(DATABASE_ENV))
    }

    fn database_path_with(&self, env_override: Option<OsString>) -> PathBuf {
        env_override
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.database_path.clone())
            .unwrap_or_else(|| data_dir().join("forgekey.db"))
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("forgekey")
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("forgekey")
}
