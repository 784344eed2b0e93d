use serde::Serialize;
use utoipa::ToSchema;

use crate::dao::models::LeaderboardEntryEntity;

use super::common::QueryParams;

/// Number of rows returned when no `limit` is given.
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;

/// Query parameters of `GET ?action=leaderboard`.
#[derive(Debug, Default)]
pub struct LeaderboardQuery {
    /// Raw `limit` value, parsed by the service.
    pub limit: Option<String>,
}

impl LeaderboardQuery {
    /// Extract the recognised parameters.
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            limit: params.get("limit").cloned(),
        }
    }
}

/// One ranked player.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub username: String,
    pub rating: i32,
    pub wins: i32,
    pub total_games: i32,
}

impl From<LeaderboardEntryEntity> for LeaderboardEntry {
    fn from(entity: LeaderboardEntryEntity) -> Self {
        Self {
            username: entity.username,
            rating: entity.rating,
            wins: entity.wins,
            total_games: entity.total_games,
        }
    }
}
