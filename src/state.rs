use std::sync::Arc;

use crate::actions::Actions;
use crate::cache::ViewCache;
use crate::config::{AppConfig, StorageKind};
use crate::database::{DatabaseError, DatabaseManager};
use crate::repositories::{Backend, MemoryBackend, PgBackend};

/// Shared state handed to every HTTP handler and CLI command.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub actions: Actions,
    /// `None` when running on the in-memory backend
    pub database: Option<DatabaseManager>,
}

impl AppState {
    /// Wire the configured backend. Postgres pools connect lazily.
    pub fn from_config(config: AppConfig) -> Result<Self, DatabaseError> {
        let (backend, database): (Arc<dyn Backend>, Option<DatabaseManager>) = match config.database.storage {
            StorageKind::Postgres => {
                let manager = DatabaseManager::from_env(config.database.clone())?;
                (Arc::new(PgBackend::new(manager.clone())), Some(manager))
            }
            StorageKind::Memory => (Arc::new(MemoryBackend::new()), None),
        };
        Ok(Self::with_backend(config, backend, database))
    }

    pub fn with_backend(config: AppConfig, backend: Arc<dyn Backend>, database: Option<DatabaseManager>) -> Self {
        let actions = Actions::new(backend, ViewCache::new(), config.domain.markup_factor);
        Self {
            config: Arc::new(config),
            actions,
            database,
        }
    }
}
