// Configuration file loading

use crate::messages::Lang;
use crate::slot::{FileSlot, Slot, validate_key};
use crate::sqlite::SqliteSlot;
use crate::store::DEFAULT_KEY;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the task list is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON file per slot
    #[default]
    File,
    /// A key-value table in tasklist.db
    Sqlite,
}

/// Settings read from `config.yaml`; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub backend: Option<Backend>,
    pub key: Option<String>,
    pub lang: Option<Lang>,
    pub color: Option<bool>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub backend: Backend,
    pub key: String,
    pub lang: Lang,
    pub color: bool,
}

impl Config {
    /// Default location: `<config_dir>/tasklist/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tasklist").join("config.yaml"))
    }

    /// Parse a YAML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))?;
        debug!(path = ?path, "Loaded config");
        Ok(config)
    }

    /// Load `path` if given, otherwise the default location if it exists
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Fields set in `other` win over fields set here
    pub fn merge(self, other: Config) -> Self {
        Self {
            data_dir: other.data_dir.or(self.data_dir),
            backend: other.backend.or(self.backend),
            key: other.key.or(self.key),
            lang: other.lang.or(self.lang),
            color: other.color.or(self.color),
        }
    }

    /// Fill in defaults and validate
    pub fn resolve(self) -> Result<Settings> {
        let key = self.key.unwrap_or_else(|| DEFAULT_KEY.to_string());
        validate_key(&key).context("Invalid key in config")?;

        Ok(Settings {
            data_dir: self.data_dir.unwrap_or_else(default_data_dir),
            backend: self.backend.unwrap_or_default(),
            key,
            lang: self.lang.unwrap_or_default(),
            color: self.color.unwrap_or(true),
        })
    }
}

impl Settings {
    /// Open the configured backend rooted at `data_dir`
    pub fn open_slot(&self) -> Result<Box<dyn Slot>> {
        debug!(backend = ?self.backend, dir = ?self.data_dir, "Opening slot backend");
        let slot: Box<dyn Slot> = match self.backend {
            Backend::File => Box::new(FileSlot::open(&self.data_dir)?),
            Backend::Sqlite => Box::new(SqliteSlot::open(&self.data_dir)?),
        };
        Ok(slot)
    }
}

/// `<data_dir>/tasklist`, or `./.tasklist` when the platform has none
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("tasklist"))
        .unwrap_or_else(|| PathBuf::from(".tasklist"))
}
