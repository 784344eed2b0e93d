//! Error types shared by the PostgreSQL storage implementation.

use thiserror::Error;

use crate::dao::models::{AchievementId, PlayerId};

/// Convenient result alias returning [`PostgresDaoError`] failures.
pub type PostgresResult<T> = Result<T, PostgresDaoError>;

/// Failures that can occur while interacting with PostgreSQL.
#[derive(Debug, Error)]
pub enum PostgresDaoError {
    /// Required environment variable is missing.
    #[error("missing PostgreSQL environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// The connection string could not be parsed into pool options.
    #[error("invalid PostgreSQL connection string")]
    InvalidUrl {
        #[source]
        source: sqlx::Error,
    },
    /// A connection or transaction could not be obtained from the pool.
    #[error("failed to begin transaction")]
    Begin {
        #[source]
        source: sqlx::Error,
    },
    /// Committing a unit of work failed.
    #[error("failed to commit transaction")]
    Commit {
        #[source]
        source: sqlx::Error,
    },
    /// Applying the bundled schema failed.
    #[error("failed to apply schema")]
    Schema {
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to load player `{username}`")]
    LoadPlayer {
        username: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to create player `{username}`")]
    CreatePlayer {
        username: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to upsert player `{username}`")]
    UpsertPlayer {
        username: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to list achievements for player `{player_id}`")]
    ListAchievements {
        player_id: PlayerId,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to unlock achievement `{achievement_id}` for player `{player_id}`")]
    UnlockAchievement {
        player_id: PlayerId,
        achievement_id: AchievementId,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to update stats for player `{player_id}`")]
    UpdateStats {
        player_id: PlayerId,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to save game")]
    SaveGame {
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to load leaderboard")]
    Leaderboard {
        #[source]
        source: sqlx::Error,
    },
    #[error("PostgreSQL health check failed")]
    HealthPing {
        #[source]
        source: sqlx::Error,
    },
}
