use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::{AchievementId, PlayerAchievementEntity};

use super::{
    common::{FlexibleId, QueryParams},
    format_timestamp,
};

/// Query parameters of `GET ?action=achievements`.
#[derive(Debug, Default)]
pub struct AchievementsQuery {
    /// Required; kept raw so the service decides between "missing" and "malformed".
    pub player_id: Option<String>,
}

impl AchievementsQuery {
    /// Extract the recognised parameters.
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            player_id: params.get("playerId").cloned(),
        }
    }
}

/// Body of `POST ?action=achievement`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnlockAchievementRequest {
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub player_id: Option<FlexibleId>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub achievement_id: Option<FlexibleId>,
}

/// Catalog entry with the requesting player's unlock state.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AchievementStatus {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub requirement: i32,
    pub points: i32,
    pub unlocked: bool,
    pub unlocked_at: Option<String>,
}

impl From<PlayerAchievementEntity> for AchievementStatus {
    fn from(entity: PlayerAchievementEntity) -> Self {
        let PlayerAchievementEntity {
            achievement,
            unlocked_at,
        } = entity;
        Self {
            id: achievement.id,
            name: achievement.name,
            description: achievement.description,
            icon: achievement.icon,
            category: achievement.category,
            requirement: achievement.requirement_value,
            points: achievement.points,
            unlocked: unlocked_at.is_some(),
            unlocked_at: unlocked_at.map(format_timestamp),
        }
    }
}
