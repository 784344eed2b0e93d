//! Process-local [`GameDataStore`] mirroring the relational semantics of the Postgres backend.

use std::{collections::BTreeMap, sync::Arc};

use futures::future::BoxFuture;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::dao::{
    game_store::GameDataStore,
    models::{
        AchievementEntity, AchievementId, DEFAULT_RATING, GameEntity, GameId,
        LeaderboardEntryEntity, NewGameEntity, PlayerAchievementEntity, PlayerEntity, PlayerId,
        PlayerLookup, PlayerStatsEntity, StatsDelta, achievement_catalog,
    },
    storage::{StorageError, StorageResult},
};

/// Constraint violations the in-memory backend reports like a database would.
#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error("LIMIT must not be negative (got {limit})")]
    NegativeLimit { limit: i64 },
    #[error("player `{id}` referenced by `{column}` does not exist")]
    MissingPlayer { id: PlayerId, column: &'static str },
    #[error("integer out of range for column `{column}`")]
    OutOfRange { column: &'static str },
    #[error("player `{player_id}` or achievement `{achievement_id}` does not exist")]
    MissingUnlockTarget {
        player_id: PlayerId,
        achievement_id: AchievementId,
    },
}

impl From<MemoryStoreError> for StorageError {
    fn from(err: MemoryStoreError) -> Self {
        StorageError::backend(err)
    }
}

#[derive(Clone)]
/// In-memory store; clones share the same data.
pub struct MemoryGameStore {
    inner: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    /// Keyed by id so iteration follows insertion order.
    players: BTreeMap<PlayerId, PlayerEntity>,
    games: BTreeMap<GameId, GameEntity>,
    achievements: BTreeMap<AchievementId, AchievementEntity>,
    /// `(player, achievement)` -> unlock time.
    unlocks: BTreeMap<(PlayerId, AchievementId), OffsetDateTime>,
    next_player_id: PlayerId,
    next_game_id: GameId,
}

impl MemoryState {
    fn player_by_username(&self, username: &str) -> Option<&PlayerEntity> {
        self.players.values().find(|player| player.username == username)
    }

    fn insert_player(&mut self, username: String, now: OffsetDateTime) -> PlayerEntity {
        self.next_player_id += 1;
        let player = PlayerEntity {
            id: self.next_player_id,
            username,
            rating: DEFAULT_RATING,
            total_games: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            created_at: Some(now),
            last_login: Some(now),
        };
        self.players.insert(player.id, player.clone());
        player
    }

    fn ensure_player(&self, id: Option<PlayerId>, column: &'static str) -> StorageResult<()> {
        match id {
            Some(id) if !self.players.contains_key(&id) => {
                Err(MemoryStoreError::MissingPlayer { id, column }.into())
            }
            _ => Ok(()),
        }
    }
}

/// New row values after `delta`; fails without touching `player` when a column would overflow.
fn apply_delta(player: &PlayerEntity, delta: StatsDelta) -> Result<PlayerEntity, MemoryStoreError> {
    let add = |current: i32, change: i32, column: &'static str| {
        current
            .checked_add(change)
            .ok_or(MemoryStoreError::OutOfRange { column })
    };
    Ok(PlayerEntity {
        total_games: add(player.total_games, 1, "total_games")?,
        wins: add(player.wins, delta.wins, "wins")?,
        losses: add(player.losses, delta.losses, "losses")?,
        draws: add(player.draws, delta.draws, "draws")?,
        rating: add(player.rating, delta.rating_change, "rating")?,
        ..player.clone()
    })
}

impl MemoryGameStore {
    /// Empty store preloaded with the default achievement catalog.
    pub fn new() -> Self {
        Self::with_catalog(achievement_catalog())
    }

    /// Empty store with a custom achievement catalog.
    pub fn with_catalog(catalog: Vec<AchievementEntity>) -> Self {
        let state = MemoryState {
            achievements: catalog
                .into_iter()
                .map(|achievement| (achievement.id, achievement))
                .collect(),
            ..MemoryState::default()
        };
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Snapshot of a player row, for inspection.
    pub async fn player(&self, id: PlayerId) -> Option<PlayerEntity> {
        self.inner.read().await.players.get(&id).cloned()
    }

    /// Snapshot of a stored game, for inspection.
    pub async fn game(&self, id: GameId) -> Option<GameEntity> {
        self.inner.read().await.games.get(&id).cloned()
    }

    /// Number of recorded unlocks for a player.
    pub async fn unlock_count(&self, player_id: PlayerId) -> usize {
        self.inner
            .read()
            .await
            .unlocks
            .keys()
            .filter(|(player, _)| *player == player_id)
            .count()
    }
}

impl Default for MemoryGameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameDataStore for MemoryGameStore {
    fn find_or_create_player(
        &self,
        username: String,
    ) -> BoxFuture<'static, StorageResult<PlayerLookup>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut state = inner.write().await;
            if let Some(player) = state.player_by_username(&username) {
                return Ok(PlayerLookup::Found(player.clone()));
            }
            let player = state.insert_player(username, OffsetDateTime::now_utc());
            Ok(PlayerLookup::Created(player))
        })
    }

    fn upsert_player(
        &self,
        username: String,
        last_login: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<PlayerEntity>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut state = inner.write().await;
            if let Some(player) = state
                .players
                .values_mut()
                .find(|player| player.username == username)
            {
                player.last_login = Some(last_login);
                return Ok(player.clone());
            }
            Ok(state.insert_player(username, last_login))
        })
    }

    fn list_player_achievements(
        &self,
        player_id: PlayerId,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerAchievementEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let state = inner.read().await;
            Ok(state
                .achievements
                .values()
                .map(|achievement| PlayerAchievementEntity {
                    achievement: achievement.clone(),
                    unlocked_at: state.unlocks.get(&(player_id, achievement.id)).copied(),
                })
                .collect())
        })
    }

    fn unlock_achievement(
        &self,
        player_id: PlayerId,
        achievement_id: AchievementId,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut state = inner.write().await;
            if !state.players.contains_key(&player_id)
                || !state.achievements.contains_key(&achievement_id)
            {
                return Err(MemoryStoreError::MissingUnlockTarget {
                    player_id,
                    achievement_id,
                }
                .into());
            }
            let key = (player_id, achievement_id);
            if state.unlocks.contains_key(&key) {
                return Ok(false);
            }
            state.unlocks.insert(key, OffsetDateTime::now_utc());
            Ok(true)
        })
    }

    fn update_stats(
        &self,
        player_id: PlayerId,
        delta: StatsDelta,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerStatsEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut state = inner.write().await;
            let Some(player) = state.players.get_mut(&player_id) else {
                return Ok(None);
            };
            let updated = apply_delta(player, delta)?;
            *player = updated;
            Ok(Some(PlayerStatsEntity::from(&*player)))
        })
    }

    fn save_game(&self, game: NewGameEntity) -> BoxFuture<'static, StorageResult<GameId>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut state = inner.write().await;
            state.ensure_player(game.white_player_id, "white_player_id")?;
            state.ensure_player(game.black_player_id, "black_player_id")?;

            state.next_game_id += 1;
            let id = state.next_game_id;
            state.games.insert(
                id,
                GameEntity {
                    id,
                    game,
                    created_at: OffsetDateTime::now_utc(),
                },
            );
            Ok(id)
        })
    }

    fn leaderboard(
        &self,
        limit: i64,
    ) -> BoxFuture<'static, StorageResult<Vec<LeaderboardEntryEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            if limit < 0 {
                return Err(MemoryStoreError::NegativeLimit { limit }.into());
            }
            let state = inner.read().await;
            let mut players = state.players.values().collect::<Vec<_>>();
            // Stable sort keeps insertion order among equal ratings.
            players.sort_by(|a, b| b.rating.cmp(&a.rating));
            Ok(players
                .into_iter()
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .map(LeaderboardEntryEntity::from)
                .collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dao::models::GameStatus;

    #[tokio::test]
    async fn test_find_or_create_inserts_once() {
        let store = MemoryGameStore::new();

        let first = store.find_or_create_player("alice".into()).await.unwrap();
        let second = store.find_or_create_player("alice".into()).await.unwrap();

        let PlayerLookup::Created(created) = first else {
            panic!("first lookup should create the player");
        };
        let PlayerLookup::Found(found) = second else {
            panic!("second lookup should find the player");
        };
        assert_eq!(created.id, found.id);
        assert_eq!(created.rating, DEFAULT_RATING);
    }

    #[tokio::test]
    async fn test_upsert_only_touches_last_login() {
        let store = MemoryGameStore::new();
        let player = store
            .upsert_player("bob".into(), OffsetDateTime::UNIX_EPOCH)
            .await
            .unwrap();
        store
            .update_stats(
                player.id,
                StatsDelta {
                    wins: 1,
                    rating_change: 15,
                    ..StatsDelta::default()
                },
            )
            .await
            .unwrap();

        let later = OffsetDateTime::UNIX_EPOCH + time::Duration::days(1);
        let again = store.upsert_player("bob".into(), later).await.unwrap();

        assert_eq!(again.id, player.id);
        assert_eq!(again.rating, DEFAULT_RATING + 15);
        assert_eq!(again.wins, 1);
        assert_eq!(again.last_login, Some(later));
        assert_eq!(again.created_at, Some(OffsetDateTime::UNIX_EPOCH));
    }

    #[tokio::test]
    async fn test_unlock_reports_duplicates() {
        let store = MemoryGameStore::new();
        let player = store
            .upsert_player("carol".into(), OffsetDateTime::now_utc())
            .await
            .unwrap();

        assert!(store.unlock_achievement(player.id, 3).await.unwrap());
        assert!(!store.unlock_achievement(player.id, 3).await.unwrap());
        assert_eq!(store.unlock_count(player.id).await, 1);

        let listed = store.list_player_achievements(player.id).await.unwrap();
        let unlocked = listed
            .iter()
            .filter(|entry| entry.unlocked_at.is_some())
            .map(|entry| entry.achievement.id)
            .collect::<Vec<_>>();
        assert_eq!(unlocked, vec![3]);
        assert_eq!(listed.len(), achievement_catalog().len());
    }

    #[tokio::test]
    async fn test_unlock_rejects_unknown_rows() {
        let store = MemoryGameStore::new();
        assert!(store.unlock_achievement(99, 1).await.is_err());
    }

    #[tokio::test]
    async fn test_update_stats_unknown_player_returns_none() {
        let store = MemoryGameStore::new();
        let outcome = store
            .update_stats(42, StatsDelta::default())
            .await
            .unwrap();
        assert_eq!(outcome, None);
    }

    #[tokio::test]
    async fn test_save_game_checks_player_references() {
        let store = MemoryGameStore::new();
        let game = NewGameEntity {
            white_player_id: Some(7),
            black_player_id: None,
            game_mode: "bot".into(),
            bot_difficulty: Some(3),
            status: GameStatus::Active,
            winner: None,
            moves: json!([]),
            board_state: json!([]),
            completed_at: None,
        };

        let err = store.save_game(game).await.unwrap_err();
        assert!(err.to_string().contains("white_player_id"));
    }

    #[tokio::test]
    async fn test_leaderboard_orders_by_rating_and_rejects_negative_limit() {
        let store = MemoryGameStore::new();
        for (name, change) in [("low", -50), ("high", 300), ("mid", 20)] {
            let player = store
                .upsert_player(name.into(), OffsetDateTime::now_utc())
                .await
                .unwrap();
            store
                .update_stats(
                    player.id,
                    StatsDelta {
                        rating_change: change,
                        ..StatsDelta::default()
                    },
                )
                .await
                .unwrap();
        }

        let top = store.leaderboard(2).await.unwrap();
        let names = top.iter().map(|e| e.username.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["high", "mid"]);

        assert!(store.leaderboard(-1).await.is_err());
    }

    #[tokio::test]
    async fn test_overflowing_stats_leave_the_row_untouched() {
        let store = MemoryGameStore::new();
        let player = store
            .upsert_player("max".into(), OffsetDateTime::now_utc())
            .await
            .unwrap();

        let err = store
            .update_stats(
                player.id,
                StatsDelta {
                    wins: 1,
                    rating_change: i32::MAX,
                    ..StatsDelta::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("rating"));

        let stored = store.player(player.id).await.unwrap();
        assert_eq!(stored.total_games, 0);
        assert_eq!(stored.wins, 0);
        assert_eq!(stored.rating, DEFAULT_RATING);
    }
}
