pub mod memory;
#[cfg(feature = "postgres-store")]
pub mod postgres;

use crate::dao::models::{
    AchievementId, GameId, LeaderboardEntryEntity, NewGameEntity, PlayerAchievementEntity,
    PlayerEntity, PlayerId, PlayerLookup, PlayerStatsEntity, StatsDelta,
};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use time::OffsetDateTime;

/// Abstraction over the persistence layer for players, games and achievements.
///
/// Every call is one unit of work: implementations acquire a connection, run their statements
/// and commit before resolving.
pub trait GameDataStore: Send + Sync {
    /// Return the player named `username`, inserting it with store defaults when unknown.
    fn find_or_create_player(&self, username: String)
    -> BoxFuture<'static, StorageResult<PlayerLookup>>;
    /// Insert the player or, when the username exists, only refresh `last_login`.
    fn upsert_player(
        &self,
        username: String,
        last_login: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<PlayerEntity>>;
    /// Every catalog achievement with the player's unlock time, ordered by id.
    fn list_player_achievements(
        &self,
        player_id: PlayerId,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerAchievementEntity>>>;
    /// Record an unlock; returns `false` when the pair was already present.
    fn unlock_achievement(
        &self,
        player_id: PlayerId,
        achievement_id: AchievementId,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Count one game and apply `delta`; `None` when no player has this id.
    fn update_stats(
        &self,
        player_id: PlayerId,
        delta: StatsDelta,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerStatsEntity>>>;
    /// Insert a game and return its generated id.
    fn save_game(&self, game: NewGameEntity) -> BoxFuture<'static, StorageResult<GameId>>;
    /// Top `limit` players by rating, highest first.
    fn leaderboard(&self, limit: i64)
    -> BoxFuture<'static, StorageResult<Vec<LeaderboardEntryEntity>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
