use std::time::Duration;

use crate::config::StorageConfig;

use super::error::{PostgresDaoError, PostgresResult};

/// Runtime configuration describing how to reach PostgreSQL.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl PostgresConfig {
    /// Build the connection settings from the application storage section.
    pub fn from_storage(storage: &StorageConfig) -> PostgresResult<Self> {
        let url = storage
            .database_url
            .clone()
            .ok_or(PostgresDaoError::MissingEnvVar { var: "DATABASE_URL" })?;

        Ok(Self {
            url,
            max_connections: storage.max_connections.max(1),
            acquire_timeout: storage.acquire_timeout,
        })
    }
}
