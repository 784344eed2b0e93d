use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::PlayerStatsEntity;

use super::common::FlexibleId;

/// Body of `PUT ?action=stats`. Every counter is an increment; absent means zero.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatsRequest {
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub player_id: Option<FlexibleId>,
    #[serde(default)]
    pub wins: Option<i32>,
    #[serde(default)]
    pub losses: Option<i32>,
    #[serde(default)]
    pub draws: Option<i32>,
    /// Signed rating adjustment.
    #[serde(default)]
    pub rating_change: Option<i32>,
}

/// Aggregate statistics after an update.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub rating: i32,
    pub total_games: i32,
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
}

impl From<PlayerStatsEntity> for PlayerStats {
    fn from(entity: PlayerStatsEntity) -> Self {
        Self {
            rating: entity.rating,
            total_games: entity.total_games,
            wins: entity.wins,
            losses: entity.losses,
            draws: entity.draws,
        }
    }
}
