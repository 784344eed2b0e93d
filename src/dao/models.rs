use serde_json::Value;
use time::OffsetDateTime;

/// Identifier of a row in the `players` table.
pub type PlayerId = i32;
/// Identifier of a row in the `games` table.
pub type GameId = i32;
/// Identifier of a row in the `achievements` table.
pub type AchievementId = i32;

/// Rating given to freshly created players.
pub const DEFAULT_RATING: i32 = 1200;

/// Player profile row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Generated primary key.
    pub id: PlayerId,
    /// Unique display name.
    pub username: String,
    /// Current rating.
    pub rating: i32,
    /// Number of finished games; `wins + losses + draws` by convention.
    pub total_games: i32,
    /// Games won.
    pub wins: i32,
    /// Games lost.
    pub losses: i32,
    /// Games drawn.
    pub draws: i32,
    /// Creation timestamp, when the row carries one.
    pub created_at: Option<OffsetDateTime>,
    /// Last profile upsert, when the row carries one.
    pub last_login: Option<OffsetDateTime>,
}

/// Outcome of a get-or-create lookup by username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerLookup {
    /// The player already existed.
    Found(PlayerEntity),
    /// The player was inserted by this call.
    Created(PlayerEntity),
}

/// Increments applied to a player's aggregate statistics after a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsDelta {
    /// Added to `wins`.
    pub wins: i32,
    /// Added to `losses`.
    pub losses: i32,
    /// Added to `draws`.
    pub draws: i32,
    /// Signed change applied to `rating`.
    pub rating_change: i32,
}

/// Aggregate statistics read back after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStatsEntity {
    /// Rating after the update.
    pub rating: i32,
    /// Total games after the update.
    pub total_games: i32,
    /// Wins after the update.
    pub wins: i32,
    /// Losses after the update.
    pub losses: i32,
    /// Draws after the update.
    pub draws: i32,
}

impl From<&PlayerEntity> for PlayerStatsEntity {
    fn from(player: &PlayerEntity) -> Self {
        Self {
            rating: player.rating,
            total_games: player.total_games,
            wins: player.wins,
            losses: player.losses,
            draws: player.draws,
        }
    }
}

/// Lifecycle of a stored game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Saved without a winner.
    Active,
    /// Saved with a winner.
    Completed,
}

impl GameStatus {
    /// Column value stored in `games.status`.
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Completed => "completed",
        }
    }
}

/// Game record to insert. Moves and board state are opaque to this layer.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGameEntity {
    /// Player with the white pieces, if any.
    pub white_player_id: Option<PlayerId>,
    /// Player with the black pieces, if any.
    pub black_player_id: Option<PlayerId>,
    /// Free-text mode tag (`local`, `bot`, `online`, ...).
    pub game_mode: String,
    /// Bot level for bot games.
    pub bot_difficulty: Option<i32>,
    /// Derived from `winner`.
    pub status: GameStatus,
    /// Winner tag, set for completed games.
    pub winner: Option<String>,
    /// Ordered move records, stored verbatim.
    pub moves: Value,
    /// Board snapshot, stored verbatim.
    pub board_state: Value,
    /// Set iff `winner` is present.
    pub completed_at: Option<OffsetDateTime>,
}

/// Stored game row, as kept by the in-memory backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GameEntity {
    /// Generated primary key.
    pub id: GameId,
    /// Inserted payload.
    pub game: NewGameEntity,
    /// Insertion time.
    pub created_at: OffsetDateTime,
}

/// Static catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementEntity {
    /// Primary key.
    pub id: AchievementId,
    /// Display name.
    pub name: String,
    /// What the player has to do.
    pub description: String,
    /// Icon reference (emoji or asset name).
    pub icon: String,
    /// Grouping used by clients.
    pub category: String,
    /// Threshold the client checks progress against.
    pub requirement_value: i32,
    /// Points awarded on unlock.
    pub points: i32,
}

/// Catalog entry joined with one player's unlock record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerAchievementEntity {
    /// Catalog data.
    pub achievement: AchievementEntity,
    /// When the player unlocked it, `None` if still locked.
    pub unlocked_at: Option<OffsetDateTime>,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntryEntity {
    /// Player name.
    pub username: String,
    /// Current rating.
    pub rating: i32,
    /// Games won.
    pub wins: i32,
    /// Games played.
    pub total_games: i32,
}

impl From<&PlayerEntity> for LeaderboardEntryEntity {
    fn from(player: &PlayerEntity) -> Self {
        Self {
            username: player.username.clone(),
            rating: player.rating,
            wins: player.wins,
            total_games: player.total_games,
        }
    }
}

/// Achievement catalog seeded by the schema bootstrap and the in-memory backend.
pub fn achievement_catalog() -> Vec<AchievementEntity> {
    [
        (1, "Первая победа", "Одержите первую победу", "🏆", "victory", 1, 10),
        (2, "Покоритель новичков", "Победите бота 1-3 уровня 10 раз", "🎯", "bot", 10, 20),
        (3, "Стратег", "Победите бота 4-7 уровня 5 раз", "🧠", "bot", 5, 30),
        (4, "Гроссмейстер", "Победите бота 8-10 уровня 3 раза", "👑", "bot", 3, 50),
        (5, "Серия побед", "Выиграйте 5 игр подряд", "🔥", "victory", 5, 30),
        (6, "Мастер телепортации", "Используйте телепортацию Мага 50 раз", "✨", "pieces", 50, 20),
        (7, "Драконий всадник", "Выиграйте 10 игр с Драконом", "🐉", "pieces", 10, 25),
        (8, "Некромант", "Воскресите 25 фигур", "💀", "pieces", 25, 25),
        (9, "Марафонец", "Сыграйте 100 партий", "🎮", "games", 100, 40),
        (10, "Легенда", "Достигните рейтинга 2000", "⭐", "rating", 2000, 100),
    ]
    .into_iter()
    .map(
        |(id, name, description, icon, category, requirement_value, points)| AchievementEntity {
            id,
            name: name.to_owned(),
            description: description.to_owned(),
            icon: icon.to_owned(),
            category: category.to_owned(),
            requirement_value,
            points,
        },
    )
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_matches_client_achievements() {
        let catalog = achievement_catalog();

        assert_eq!(catalog.len(), 10);
        assert!(catalog.iter().zip(1..).all(|(entry, id)| entry.id == id));
        assert_eq!(catalog[0].name, "Первая победа");
        assert_eq!(catalog[0].description, "Одержите первую победу");
        assert_eq!(catalog[9].name, "Легенда");
        assert_eq!(catalog[9].requirement_value, 2000);
    }
}
