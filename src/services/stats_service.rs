use tracing::debug;

use crate::{
    dao::models::StatsDelta,
    dto::{
        common::present_id,
        stats::{PlayerStats, UpdateStatsRequest},
    },
    error::ServiceError,
    state::SharedState,
};

/// Count one more game for the player and add the supplied deltas.
///
/// An unknown or missing player id is not a validation error: nothing is updated and the call
/// fails like any other store-side problem.
pub async fn update_stats(
    state: &SharedState,
    request: UpdateStatsRequest,
) -> Result<PlayerStats, ServiceError> {
    let delta = StatsDelta {
        wins: request.wins.unwrap_or(0),
        losses: request.losses.unwrap_or(0),
        draws: request.draws.unwrap_or(0),
        rating_change: request.rating_change.unwrap_or(0),
    };
    let player_id = present_id(request.player_id.as_ref())
        .transpose()?
        .ok_or_else(|| ServiceError::Internal("no player id given; no stats updated".into()))?;

    let store = state.require_store()?;
    let stats = store
        .update_stats(player_id, delta)
        .await?
        .ok_or_else(|| ServiceError::Internal(format!("player {player_id} does not exist")))?;
    debug!(player_id, ?delta, "updated player stats");

    Ok(stats.into())
}
