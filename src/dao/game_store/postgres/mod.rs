mod config;
mod error;
mod schema;
pub mod store;

pub use config::PostgresConfig;
pub use error::PostgresDaoError;
pub use store::PostgresGameStore;

use crate::dao::storage::StorageError;

impl From<PostgresDaoError> for StorageError {
    fn from(err: PostgresDaoError) -> Self {
        StorageError::backend(err)
    }
}
