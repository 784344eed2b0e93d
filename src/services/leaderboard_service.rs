use crate::{
    dto::leaderboard::{DEFAULT_LEADERBOARD_LIMIT, LeaderboardEntry, LeaderboardQuery},
    error::ServiceError,
    state::SharedState,
};

/// Top players by rating, highest first.
pub async fn leaderboard(
    state: &SharedState,
    query: LeaderboardQuery,
) -> Result<Vec<LeaderboardEntry>, ServiceError> {
    let limit = match query.limit {
        None => DEFAULT_LEADERBOARD_LIMIT,
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|err| ServiceError::Internal(format!("invalid limit `{raw}`: {err}")))?,
    };

    let store = state.require_store()?;
    let entries = store.leaderboard(limit).await?;

    Ok(entries.into_iter().map(Into::into).collect())
}
