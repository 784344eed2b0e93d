pub mod store;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    dao::{game_store::GameDataStore, storage::StorageError},
};

use self::store::StoreSlot;

pub type SharedState = Arc<AppState>;

/// Central application state: immutable configuration and the storage handle.
pub struct AppState {
    config: AppConfig,
    store: StoreSlot,
}

impl AppState {
    /// Resolve the configured backend and wrap the result in an [`Arc`].
    pub async fn from_config(config: AppConfig) -> SharedState {
        let store = store::resolve(&config).await;
        Arc::new(Self { config, store })
    }

    /// State around an already constructed store.
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn GameDataStore>,
        backend: &'static str,
    ) -> SharedState {
        Arc::new(Self {
            config,
            store: StoreSlot::Installed { store, backend },
        })
    }

    /// State without any store; every operation fails with `reason`.
    pub fn without_store(config: AppConfig, reason: impl Into<String>) -> SharedState {
        Arc::new(Self {
            config,
            store: StoreSlot::Missing {
                reason: reason.into(),
            },
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the store, or the reason none is installed.
    pub fn require_store(&self) -> Result<Arc<dyn GameDataStore>, StorageError> {
        match &self.store {
            StoreSlot::Installed { store, .. } => Ok(store.clone()),
            StoreSlot::Missing { reason } => Err(StorageError::NotConfigured {
                reason: reason.clone(),
            }),
        }
    }

    /// Name of the installed backend, `"none"` when degraded.
    pub fn storage_backend(&self) -> &'static str {
        match &self.store {
            StoreSlot::Installed { backend, .. } => *backend,
            StoreSlot::Missing { .. } => "none",
        }
    }
}
