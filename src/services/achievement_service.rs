use tracing::debug;

use crate::{
    dto::{
        achievement::{AchievementStatus, AchievementsQuery, UnlockAchievementRequest},
        common::{SuccessResponse, present_id},
    },
    error::ServiceError,
    state::SharedState,
};

const PLAYER_ID_REQUIRED: &str = "Player ID required";
const UNLOCK_IDS_REQUIRED: &str = "Player ID and Achievement ID required";

/// List the whole catalog with the player's unlock state, ordered by achievement id.
pub async fn list_achievements(
    state: &SharedState,
    query: AchievementsQuery,
) -> Result<Vec<AchievementStatus>, ServiceError> {
    let raw = query
        .player_id
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| ServiceError::InvalidInput(PLAYER_ID_REQUIRED.into()))?;
    let player_id = raw
        .trim()
        .parse::<i32>()
        .map_err(|err| ServiceError::Internal(format!("invalid player id `{raw}`: {err}")))?;

    let store = state.require_store()?;
    let achievements = store.list_player_achievements(player_id).await?;

    Ok(achievements.into_iter().map(Into::into).collect())
}

/// Record an unlock. Repeated unlocks are accepted and answered identically.
pub async fn unlock_achievement(
    state: &SharedState,
    request: UnlockAchievementRequest,
) -> Result<SuccessResponse, ServiceError> {
    let (Some(player_id), Some(achievement_id)) = (
        present_id(request.player_id.as_ref()),
        present_id(request.achievement_id.as_ref()),
    ) else {
        return Err(ServiceError::InvalidInput(UNLOCK_IDS_REQUIRED.into()));
    };
    let (player_id, achievement_id) = (player_id?, achievement_id?);

    let store = state.require_store()?;
    let newly_unlocked = store.unlock_achievement(player_id, achievement_id).await?;
    debug!(player_id, achievement_id, newly_unlocked, "achievement unlock recorded");

    Ok(SuccessResponse::ok())
}
