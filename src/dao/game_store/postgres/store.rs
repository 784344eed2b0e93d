use futures::future::BoxFuture;
use sqlx::{
    PgPool, Row,
    postgres::{PgPoolOptions, PgRow},
    types::Json,
};
use time::OffsetDateTime;
use tracing::info;

use super::{
    config::PostgresConfig,
    error::{PostgresDaoError, PostgresResult},
    schema,
};
use crate::dao::{
    game_store::GameDataStore,
    models::{
        AchievementEntity, AchievementId, GameId, LeaderboardEntryEntity, NewGameEntity,
        PlayerAchievementEntity, PlayerEntity, PlayerId, PlayerLookup, PlayerStatsEntity,
        StatsDelta,
    },
    storage::StorageResult,
};

const PLAYER_COLUMNS: &str =
    "id, username, rating, total_games, wins, losses, draws, created_at, last_login";

/// PostgreSQL-backed store sharing a bounded connection pool.
#[derive(Clone)]
pub struct PostgresGameStore {
    pool: PgPool,
}

impl PostgresGameStore {
    /// Build the pool without connecting; the first operation opens the first connection.
    pub fn connect_lazy(config: &PostgresConfig) -> PostgresResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy(&config.url)
            .map_err(|source| PostgresDaoError::InvalidUrl { source })?;

        info!(
            max_connections = config.max_connections,
            "configured PostgreSQL connection pool"
        );
        Ok(Self { pool })
    }

    /// Create missing tables and seed the achievement catalog.
    pub async fn ensure_schema(&self) -> PostgresResult<()> {
        schema::apply(&self.pool).await
    }

    fn player_from_row(row: &PgRow) -> sqlx::Result<PlayerEntity> {
        Ok(PlayerEntity {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            rating: row.try_get("rating")?,
            total_games: row.try_get("total_games")?,
            wins: row.try_get("wins")?,
            losses: row.try_get("losses")?,
            draws: row.try_get("draws")?,
            created_at: row.try_get("created_at")?,
            last_login: row.try_get("last_login")?,
        })
    }

    fn player_achievement_from_row(row: &PgRow) -> sqlx::Result<PlayerAchievementEntity> {
        Ok(PlayerAchievementEntity {
            achievement: AchievementEntity {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                description: row.try_get("description")?,
                icon: row.try_get("icon")?,
                category: row.try_get("category")?,
                requirement_value: row.try_get("requirement_value")?,
                points: row.try_get("points")?,
            },
            unlocked_at: row.try_get("unlocked_at")?,
        })
    }

    async fn find_or_create_player(&self, username: String) -> PostgresResult<PlayerLookup> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|source| PostgresDaoError::Begin { source })?;

        let existing = sqlx::query(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players WHERE username = $1"
        ))
        .bind(&username)
        .fetch_optional(&mut *tx)
        .await
        .and_then(|row| row.as_ref().map(Self::player_from_row).transpose())
        .map_err(|source| PostgresDaoError::LoadPlayer {
            username: username.clone(),
            source,
        })?;

        if let Some(player) = existing {
            return Ok(PlayerLookup::Found(player));
        }

        // Concurrent creation of the same name is left to the unique constraint.
        let player = sqlx::query(&format!(
            "INSERT INTO players (username) VALUES ($1) RETURNING {PLAYER_COLUMNS}"
        ))
        .bind(&username)
        .fetch_one(&mut *tx)
        .await
        .and_then(|row| Self::player_from_row(&row))
        .map_err(|source| PostgresDaoError::CreatePlayer {
            username: username.clone(),
            source,
        })?;

        tx.commit()
            .await
            .map_err(|source| PostgresDaoError::Commit { source })?;

        Ok(PlayerLookup::Created(player))
    }

    async fn upsert_player(
        &self,
        username: String,
        last_login: OffsetDateTime,
    ) -> PostgresResult<PlayerEntity> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|source| PostgresDaoError::Begin { source })?;

        let player = sqlx::query(&format!(
            "INSERT INTO players (username, last_login) VALUES ($1, $2) \
             ON CONFLICT (username) DO UPDATE SET last_login = EXCLUDED.last_login \
             RETURNING {PLAYER_COLUMNS}"
        ))
        .bind(&username)
        .bind(last_login)
        .fetch_one(&mut *tx)
        .await
        .and_then(|row| Self::player_from_row(&row))
        .map_err(|source| PostgresDaoError::UpsertPlayer {
            username: username.clone(),
            source,
        })?;

        tx.commit()
            .await
            .map_err(|source| PostgresDaoError::Commit { source })?;

        Ok(player)
    }

    async fn list_player_achievements(
        &self,
        player_id: PlayerId,
    ) -> PostgresResult<Vec<PlayerAchievementEntity>> {
        let rows = sqlx::query(
            "SELECT a.id, a.name, a.description, a.icon, a.category, \
                    a.requirement_value, a.points, pa.unlocked_at \
             FROM achievements a \
             LEFT JOIN player_achievements pa \
                    ON a.id = pa.achievement_id AND pa.player_id = $1 \
             ORDER BY a.id",
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|source| PostgresDaoError::ListAchievements { player_id, source })?;

        rows.iter()
            .map(Self::player_achievement_from_row)
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(|source| PostgresDaoError::ListAchievements { player_id, source })
    }

    async fn unlock_achievement(
        &self,
        player_id: PlayerId,
        achievement_id: AchievementId,
    ) -> PostgresResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|source| PostgresDaoError::Begin { source })?;

        let result = sqlx::query(
            "INSERT INTO player_achievements (player_id, achievement_id) VALUES ($1, $2) \
             ON CONFLICT (player_id, achievement_id) DO NOTHING",
        )
        .bind(player_id)
        .bind(achievement_id)
        .execute(&mut *tx)
        .await
        .map_err(|source| PostgresDaoError::UnlockAchievement {
            player_id,
            achievement_id,
            source,
        })?;

        tx.commit()
            .await
            .map_err(|source| PostgresDaoError::Commit { source })?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_stats(
        &self,
        player_id: PlayerId,
        delta: StatsDelta,
    ) -> PostgresResult<Option<PlayerStatsEntity>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|source| PostgresDaoError::Begin { source })?;

        // Single statement so concurrent updates for one player stay additive.
        let stats = sqlx::query(
            "UPDATE players \
             SET total_games = total_games + 1, \
                 wins = wins + $1, \
                 losses = losses + $2, \
                 draws = draws + $3, \
                 rating = rating + $4 \
             WHERE id = $5 \
             RETURNING rating, total_games, wins, losses, draws",
        )
        .bind(delta.wins)
        .bind(delta.losses)
        .bind(delta.draws)
        .bind(delta.rating_change)
        .bind(player_id)
        .fetch_optional(&mut *tx)
        .await
        .and_then(|row| {
            row.map(|row| {
                Ok::<_, sqlx::Error>(PlayerStatsEntity {
                    rating: row.try_get("rating")?,
                    total_games: row.try_get("total_games")?,
                    wins: row.try_get("wins")?,
                    losses: row.try_get("losses")?,
                    draws: row.try_get("draws")?,
                })
            })
            .transpose()
        })
        .map_err(|source| PostgresDaoError::UpdateStats { player_id, source })?;

        tx.commit()
            .await
            .map_err(|source| PostgresDaoError::Commit { source })?;

        Ok(stats)
    }

    async fn save_game(&self, game: NewGameEntity) -> PostgresResult<GameId> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|source| PostgresDaoError::Begin { source })?;

        let id = sqlx::query_scalar::<_, GameId>(
            "INSERT INTO games (white_player_id, black_player_id, game_mode, bot_difficulty, \
                                status, winner, moves_json, board_state, completed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING id",
        )
        .bind(game.white_player_id)
        .bind(game.black_player_id)
        .bind(&game.game_mode)
        .bind(game.bot_difficulty)
        .bind(game.status.as_str())
        .bind(&game.winner)
        .bind(Json(&game.moves))
        .bind(Json(&game.board_state))
        .bind(game.completed_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|source| PostgresDaoError::SaveGame { source })?;

        tx.commit()
            .await
            .map_err(|source| PostgresDaoError::Commit { source })?;

        Ok(id)
    }

    async fn leaderboard(&self, limit: i64) -> PostgresResult<Vec<LeaderboardEntryEntity>> {
        let rows = sqlx::query(
            "SELECT username, rating, wins, total_games \
             FROM players \
             ORDER BY rating DESC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|source| PostgresDaoError::Leaderboard { source })?;

        rows.iter()
            .map(|row| {
                Ok::<_, sqlx::Error>(LeaderboardEntryEntity {
                    username: row.try_get("username")?,
                    rating: row.try_get("rating")?,
                    wins: row.try_get("wins")?,
                    total_games: row.try_get("total_games")?,
                })
            })
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(|source| PostgresDaoError::Leaderboard { source })
    }

    async fn ping(&self) -> PostgresResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|source| PostgresDaoError::HealthPing { source })?;
        Ok(())
    }
}

impl GameDataStore for PostgresGameStore {
    fn find_or_create_player(
        &self,
        username: String,
    ) -> BoxFuture<'static, StorageResult<PlayerLookup>> {
        let store = self.clone();
        Box::pin(async move { store.find_or_create_player(username).await.map_err(Into::into) })
    }

    fn upsert_player(
        &self,
        username: String,
        last_login: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<PlayerEntity>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .upsert_player(username, last_login)
                .await
                .map_err(Into::into)
        })
    }

    fn list_player_achievements(
        &self,
        player_id: PlayerId,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerAchievementEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_player_achievements(player_id)
                .await
                .map_err(Into::into)
        })
    }

    fn unlock_achievement(
        &self,
        player_id: PlayerId,
        achievement_id: AchievementId,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .unlock_achievement(player_id, achievement_id)
                .await
                .map_err(Into::into)
        })
    }

    fn update_stats(
        &self,
        player_id: PlayerId,
        delta: StatsDelta,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.update_stats(player_id, delta).await.map_err(Into::into) })
    }

    fn save_game(&self, game: NewGameEntity) -> BoxFuture<'static, StorageResult<GameId>> {
        let store = self.clone();
        Box::pin(async move { store.save_game(game).await.map_err(Into::into) })
    }

    fn leaderboard(
        &self,
        limit: i64,
    ) -> BoxFuture<'static, StorageResult<Vec<LeaderboardEntryEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.leaderboard(limit).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}
