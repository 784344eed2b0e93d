use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::dao::models::GameId;

use super::common::FlexibleId;

/// Mode recorded when the client does not send one.
pub const DEFAULT_GAME_MODE: &str = "local";

/// Body of `POST ?action=game`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveGameRequest {
    /// Absent for local or bot play.
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub white_player_id: Option<FlexibleId>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub black_player_id: Option<FlexibleId>,
    /// Defaults to `local`.
    #[serde(default)]
    pub game_mode: Option<String>,
    #[serde(default)]
    pub bot_difficulty: Option<i32>,
    /// Any non-empty value marks the game as completed.
    #[serde(default)]
    pub winner: Option<String>,
    /// Ordered move records; stored verbatim, `[]` when absent.
    #[serde(default)]
    pub moves: Option<Value>,
    /// Board snapshot; stored verbatim, `[]` when absent.
    #[serde(default)]
    pub board_state: Option<Value>,
}

/// Identifier of the stored game.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameSaved {
    pub game_id: GameId,
}
