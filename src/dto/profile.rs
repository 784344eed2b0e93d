use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::{PlayerEntity, PlayerId};

use super::{common::QueryParams, format_timestamp};

/// Query parameters of `GET ?action=profile`.
#[derive(Debug, Default)]
pub struct ProfileQuery {
    /// Exact username to look up; the configured placeholder when absent.
    pub username: Option<String>,
}

impl ProfileQuery {
    /// Extract the recognised parameters.
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            username: params.get("username").cloned(),
        }
    }
}

/// Body of `POST ?action=profile`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProfileRequest {
    /// Username to create or refresh; the configured placeholder when absent.
    #[serde(default)]
    pub username: Option<String>,
}

/// Player profile as returned to clients.
///
/// `createdAt` and `lastLogin` are only present when the profile was read back from an existing
/// row; they are omitted for freshly created or upserted profiles.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub username: String,
    pub rating: i32,
    pub total_games: i32,
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub created_at: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub last_login: Option<Option<String>>,
}

impl PlayerProfile {
    /// Full projection, timestamps included (as `null` when the row has none).
    pub fn with_timestamps(player: PlayerEntity) -> Self {
        let created_at = Some(player.created_at.map(format_timestamp));
        let last_login = Some(player.last_login.map(format_timestamp));
        Self {
            created_at,
            last_login,
            ..Self::without_timestamps(player)
        }
    }

    /// Projection used for newly created or upserted players.
    pub fn without_timestamps(player: PlayerEntity) -> Self {
        Self {
            id: player.id,
            username: player.username,
            rating: player.rating,
            total_games: player.total_games,
            wins: player.wins,
            losses: player.losses,
            draws: player.draws,
            created_at: None,
            last_login: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::OffsetDateTime;

    use super::*;

    fn alice() -> PlayerEntity {
        PlayerEntity {
            id: 1,
            username: "Alice".into(),
            rating: 1200,
            total_games: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            created_at: Some(OffsetDateTime::UNIX_EPOCH),
            last_login: None,
        }
    }

    #[test]
    fn test_created_profile_omits_timestamps() {
        let value = serde_json::to_value(PlayerProfile::without_timestamps(alice())).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "username": "Alice",
                "rating": 1200,
                "totalGames": 0,
                "wins": 0,
                "losses": 0,
                "draws": 0
            })
        );
    }

    #[test]
    fn test_existing_profile_exposes_timestamps_or_null() {
        let value = serde_json::to_value(PlayerProfile::with_timestamps(alice())).unwrap();
        assert_eq!(value["createdAt"], json!("1970-01-01T00:00:00Z"));
        assert!(value["lastLogin"].is_null());
        assert!(value.as_object().unwrap().contains_key("lastLogin"));
    }
}
