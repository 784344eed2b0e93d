//! Storage backend selection performed once at startup.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    config::{AppConfig, StorageBackend},
    dao::game_store::{GameDataStore, memory::MemoryGameStore},
};

/// Result of resolving the configured backend.
pub enum StoreSlot {
    /// A store is ready to serve operations.
    Installed {
        store: Arc<dyn GameDataStore>,
        backend: &'static str,
    },
    /// No store could be built; operations fail with `reason`.
    Missing { reason: String },
}

/// Build the store named by the configuration.
///
/// A missing or invalid connection string does not abort startup; the slot records why so each
/// operation can report it.
pub async fn resolve(config: &AppConfig) -> StoreSlot {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("using in-memory storage; data is lost on restart");
            StoreSlot::Installed {
                store: Arc::new(MemoryGameStore::new()),
                backend: "memory",
            }
        }
        StorageBackend::Postgres => resolve_postgres(config).await,
    }
}

#[cfg(feature = "postgres-store")]
async fn resolve_postgres(config: &AppConfig) -> StoreSlot {
    use crate::dao::{
        game_store::postgres::{PostgresConfig, PostgresGameStore},
        storage::StorageError,
    };

    let store = PostgresConfig::from_storage(&config.storage)
        .and_then(|pg_config| PostgresGameStore::connect_lazy(&pg_config));

    let store = match store {
        Ok(store) => store,
        Err(err) => {
            let reason = StorageError::from(err).to_string();
            warn!(%reason, "PostgreSQL storage unavailable; running degraded");
            return StoreSlot::Missing { reason };
        }
    };

    if config.storage.apply_schema {
        if let Err(err) = store.ensure_schema().await {
            warn!(error = %StorageError::from(err), "failed to apply database schema");
        }
    }

    StoreSlot::Installed {
        store: Arc::new(store),
        backend: "postgres",
    }
}

#[cfg(not(feature = "postgres-store"))]
async fn resolve_postgres(_config: &AppConfig) -> StoreSlot {
    let reason = "PostgreSQL support is not compiled in (enable `postgres-store`)".to_string();
    warn!(%reason, "storage unavailable; running degraded");
    StoreSlot::Missing { reason }
}
