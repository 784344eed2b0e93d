use time::OffsetDateTime;
use tracing::debug;

use crate::{
    dao::models::PlayerLookup,
    dto::profile::{PlayerProfile, ProfileQuery, ProfileRequest},
    error::ServiceError,
    state::SharedState,
};

/// Return the named player's profile, creating the player on first lookup.
///
/// Existing profiles carry `createdAt`/`lastLogin`; a profile created by this call does not.
pub async fn get_profile(
    state: &SharedState,
    query: ProfileQuery,
) -> Result<PlayerProfile, ServiceError> {
    let username = query
        .username
        .unwrap_or_else(|| state.config().default_username.clone());
    let store = state.require_store()?;

    match store.find_or_create_player(username).await? {
        PlayerLookup::Found(player) => Ok(PlayerProfile::with_timestamps(player)),
        PlayerLookup::Created(player) => {
            debug!(player_id = player.id, username = %player.username, "created player on lookup");
            Ok(PlayerProfile::without_timestamps(player))
        }
    }
}

/// Insert the player or refresh its `last_login`, leaving rating and totals untouched.
pub async fn upsert_profile(
    state: &SharedState,
    request: ProfileRequest,
) -> Result<PlayerProfile, ServiceError> {
    let username = request
        .username
        .unwrap_or_else(|| state.config().default_username.clone());
    let store = state.require_store()?;

    let player = store
        .upsert_player(username, OffsetDateTime::now_utc())
        .await?;
    debug!(player_id = player.id, "upserted player profile");

    Ok(PlayerProfile::without_timestamps(player))
}
