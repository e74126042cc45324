use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::session::{Mode, SessionConfig, DEFAULT_TIME_LIMIT, DEFAULT_WORD_LIMIT};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{limit} is not an offered limit for {mode} mode")]
    InvalidLimit { mode: Mode, limit: u32 },
    #[error("the rest store backend needs a store url")]
    MissingStoreUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Rest,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub sqlite_path: Option<PathBuf>,
    pub rest_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    pub word_limit: u32,
    pub time_limit: u32,
    pub identity: Option<String>,
    pub display_name: Option<String>,
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Words,
            word_limit: DEFAULT_WORD_LIMIT,
            time_limit: DEFAULT_TIME_LIMIT,
            identity: None,
            display_name: None,
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Session settings for the selected mode. A stale or hand-edited limit
    /// falls back to the mode default.
    pub fn session_config(&self) -> SessionConfig {
        let limit = match self.mode {
            Mode::Words => self.word_limit,
            Mode::Time => self.time_limit,
        };
        SessionConfig::new(self.mode, limit).unwrap_or_else(|e| {
            log::warn!("{e}; using default");
            SessionConfig::unchecked(self.mode, self.mode.default_limit())
        })
    }

    /// Records the mode and its limit, keeping the other mode's limit
    pub fn set_session(&mut self, session: SessionConfig) {
        self.mode = session.mode;
        match session.mode {
            Mode::Words => self.word_limit = session.limit,
            Mode::Time => self.time_limit = session.limit,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_load(&self) -> Result<Config, ConfigError> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match self.try_load() {
            Ok(cfg) => cfg,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Config::default()
            }
            Err(e) => {
                log::warn!("ignoring config at {}: {e}", self.path.display());
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
