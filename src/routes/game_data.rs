use axum::{
    Router,
    body::Bytes,
    extract::{FromRequest, Query, Request, State},
    http::Method,
    routing::any,
};

use crate::{
    dto::common::QueryParams,
    error::AppError,
    services::dispatcher::{self, GameRequest, GameResponse},
    state::SharedState,
};

/// The single game data endpoint, reachable at the root and under `/api/game`.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", any(handle_game_data))
        .route("/api/game", any(handle_game_data))
}

/// Raw request body whose rejections (oversized, unreadable) keep the JSON error envelope.
#[derive(Debug)]
pub struct GameBody(pub Bytes);

impl<S> FromRequest<S> for GameBody
where
    S: Send + Sync,
{
    type Rejection = GameResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Bytes::from_request(req, state)
            .await
            .map(GameBody)
            .map_err(|rejection| GameResponse::error(rejection.status(), rejection.body_text()))
    }
}

/// Dispatch on `(method, action)`; see the operation table in the API description.
#[utoipa::path(
    method(get, post, put, options),
    path = "/api/game",
    tag = "game-data",
    params(
        ("action" = Option<String>, Query, description = "profile | achievements | achievement | stats | game | leaderboard"),
        ("username" = Option<String>, Query, description = "GET profile: player to look up"),
        ("playerId" = Option<i32>, Query, description = "GET achievements: player whose unlocks to report"),
        ("limit" = Option<i64>, Query, description = "GET leaderboard: number of rows, default 10"),
    ),
    request_body(content = Object, content_type = "application/json", description = "Operation body; empty reads as {}"),
    responses(
        (status = 200, description = "Operation result (profile, achievements, stats, game id, leaderboard or success flag)"),
        (status = 400, description = "Required field missing", body = crate::dto::common::ErrorBody),
        (status = 404, description = "Unknown method/action pair", body = crate::dto::common::ErrorBody),
        (status = 413, description = "Body exceeds the 2 MB limit", body = crate::dto::common::ErrorBody),
        (status = 500, description = "Store or unexpected failure", body = crate::dto::common::ErrorBody),
    )
)]
pub async fn handle_game_data(
    State(state): State<SharedState>,
    method: Method,
    Query(params): Query<QueryParams>,
    GameBody(body): GameBody,
) -> GameResponse {
    dispatcher::dispatch(&state, GameRequest { method, params, body }).await
}

/// Paths outside the router answer like an unknown action.
pub async fn unmatched_path() -> GameResponse {
    AppError::route_not_found().into()
}
