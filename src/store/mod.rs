pub mod rest;
pub mod sqlite;

use std::sync::Arc;

pub use rest::RestStore;
pub use sqlite::SqliteStore;

use crate::app_dirs::AppDirs;
use crate::config::{ConfigError, StoreBackend, StoreConfig};
use crate::leaderboard::{ScoreStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum OpenStoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Opens the configured backend. A display name is registered with the local
/// database so its leaderboard can show it.
pub fn open(
    cfg: &StoreConfig,
    identity: Option<(&str, &str)>,
) -> Result<Arc<dyn ScoreStore>, OpenStoreError> {
    match cfg.backend {
        StoreBackend::Sqlite => {
            let path = cfg
                .sqlite_path
                .clone()
                .unwrap_or_else(AppDirs::scores_db_path);
            log::info!("using local leaderboard at {}", path.display());
            let store = SqliteStore::open(&path)?;
            if let Some((id, name)) = identity {
                store.upsert_profile(id, name)?;
            }
            Ok(Arc::new(store))
        }
        StoreBackend::Rest => {
            let url = cfg.rest_url.as_deref().ok_or(ConfigError::MissingStoreUrl)?;
            log::info!("using remote leaderboard at {url}");
            Ok(Arc::new(RestStore::new(url, cfg.api_key.clone())?))
        }
    }
}
