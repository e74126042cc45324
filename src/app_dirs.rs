use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "symtype";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    /// `$HOME/.local/state/symtype`, or the platform data dir without `$HOME`
    pub fn state_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".local").join("state").join(APP_NAME)
        } else {
            Self::project()
                .map(|p| p.data_local_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|p| p.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("symtype_config.json"))
    }

    pub fn scores_db_path() -> PathBuf {
        Self::state_dir().join("scores.db")
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir().join("symtype.log")
    }
}
