//! `(method, action)` routing for the single game data endpoint.

use std::panic::AssertUnwindSafe;

use axum::{
    body::Bytes,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::FutureExt;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{error, warn};

use crate::{
    dto::{
        achievement::AchievementsQuery,
        common::QueryParams,
        leaderboard::LeaderboardQuery,
        profile::ProfileQuery,
    },
    error::{AppError, ServiceError},
    services::{
        achievement_service, game_service, leaderboard_service, profile_service, stats_service,
    },
    state::SharedState,
};

const ALLOWED_METHODS: &str = "GET, POST, PUT, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";
const PREFLIGHT_MAX_AGE: &str = "86400";

/// Inbound request, reduced to what routing needs.
#[derive(Debug, Clone)]
pub struct GameRequest {
    /// HTTP method.
    pub method: Method,
    /// Every query string parameter, `action` included.
    pub params: QueryParams,
    /// Raw body; empty for GET requests.
    pub body: Bytes,
}

impl GameRequest {
    fn action(&self) -> Option<&str> {
        self.params.get("action").map(String::as_str)
    }
}

/// The seven data operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `GET ?action=profile`
    GetProfile,
    /// `POST ?action=profile`
    UpsertProfile,
    /// `GET ?action=achievements`
    ListAchievements,
    /// `POST ?action=achievement`
    UnlockAchievement,
    /// `PUT ?action=stats`
    UpdateStats,
    /// `POST ?action=game`
    SaveGame,
    /// `GET ?action=leaderboard`
    Leaderboard,
}

/// Where a request goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// CORS preflight; answered without looking at the action.
    Preflight,
    /// One of the data operations.
    Operation(Operation),
    /// Unknown `(method, action)` pair.
    NotFound,
}

impl Route {
    /// Resolve the routing table entry for a method and `action` value.
    pub fn resolve(method: &Method, action: Option<&str>) -> Self {
        if method == Method::OPTIONS {
            return Route::Preflight;
        }

        let operation = match (method.as_str(), action.unwrap_or_default()) {
            ("GET", "profile") => Operation::GetProfile,
            ("GET", "achievements") => Operation::ListAchievements,
            ("GET", "leaderboard") => Operation::Leaderboard,
            ("POST", "profile") => Operation::UpsertProfile,
            ("POST", "game") => Operation::SaveGame,
            ("POST", "achievement") => Operation::UnlockAchievement,
            ("PUT", "stats") => Operation::UpdateStats,
            _ => return Route::NotFound,
        };
        Route::Operation(operation)
    }
}

/// Outcome of a dispatched request: status plus optional JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct GameResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// JSON payload; `None` only for preflight answers.
    pub body: Option<Value>,
}

impl GameResponse {
    /// Empty 200 answer to a CORS preflight.
    pub fn preflight() -> Self {
        Self {
            status: StatusCode::OK,
            body: None,
        }
    }

    fn ok<T: Serialize>(payload: T) -> Result<Self, ServiceError> {
        Ok(Self {
            status: StatusCode::OK,
            body: Some(serde_json::to_value(payload)?),
        })
    }

    /// `{"error": message}` with the given status.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self {
            status,
            body: Some(json!({ "error": message })),
        }
    }
}

impl From<AppError> for GameResponse {
    fn from(err: AppError) -> Self {
        Self::error(err.status(), err.to_string())
    }
}

impl IntoResponse for GameResponse {
    fn into_response(self) -> Response {
        let allow_origin = (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        match self.body {
            Some(body) => (
                self.status,
                [
                    (
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    ),
                    allow_origin,
                ],
                body.to_string(),
            )
                .into_response(),
            None => (
                self.status,
                [
                    allow_origin,
                    (
                        header::ACCESS_CONTROL_ALLOW_METHODS,
                        HeaderValue::from_static(ALLOWED_METHODS),
                    ),
                    (
                        header::ACCESS_CONTROL_ALLOW_HEADERS,
                        HeaderValue::from_static(ALLOWED_HEADERS),
                    ),
                    (
                        header::ACCESS_CONTROL_MAX_AGE,
                        HeaderValue::from_static(PREFLIGHT_MAX_AGE),
                    ),
                ],
            )
                .into_response(),
        }
    }
}

/// Route a request to its operation and turn every outcome into a response.
///
/// Errors never escape: validation failures become 400, anything else (panics included) 500.
pub async fn dispatch(state: &SharedState, request: GameRequest) -> GameResponse {
    let operation = match Route::resolve(&request.method, request.action()) {
        Route::Preflight => return GameResponse::preflight(),
        Route::NotFound => return AppError::route_not_found().into(),
        Route::Operation(operation) => operation,
    };

    let outcome = AssertUnwindSafe(run(state, operation, &request))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(ServiceError::Internal(panic_message(panic.as_ref()))));

    match outcome {
        Ok(response) => response,
        Err(err) => {
            let err = AppError::from(err);
            if err.status().is_server_error() {
                error!(?operation, error = %err, "game data operation failed");
            } else {
                warn!(?operation, error = %err, "rejected game data request");
            }
            err.into()
        }
    }
}

async fn run(
    state: &SharedState,
    operation: Operation,
    request: &GameRequest,
) -> Result<GameResponse, ServiceError> {
    let params = &request.params;
    match operation {
        Operation::GetProfile => GameResponse::ok(
            profile_service::get_profile(state, ProfileQuery::from_params(params)).await?,
        ),
        Operation::UpsertProfile => GameResponse::ok(
            profile_service::upsert_profile(state, parse_body(&request.body)?).await?,
        ),
        Operation::ListAchievements => GameResponse::ok(
            achievement_service::list_achievements(state, AchievementsQuery::from_params(params))
                .await?,
        ),
        Operation::UnlockAchievement => GameResponse::ok(
            achievement_service::unlock_achievement(state, parse_body(&request.body)?).await?,
        ),
        Operation::UpdateStats => GameResponse::ok(
            stats_service::update_stats(state, parse_body(&request.body)?).await?,
        ),
        Operation::SaveGame => {
            GameResponse::ok(game_service::save_game(state, parse_body(&request.body)?).await?)
        }
        Operation::Leaderboard => GameResponse::ok(
            leaderboard_service::leaderboard(state, LeaderboardQuery::from_params(params)).await?,
        ),
    }
}

/// Decode a JSON body; an empty body reads as `{}`.
fn parse_body<T>(body: &Bytes) -> Result<T, ServiceError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(body)?)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "operation panicked".into())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[test]
    fn test_routing_table() {
        assert_eq!(
            Route::resolve(&Method::GET, Some("profile")),
            Route::Operation(Operation::GetProfile)
        );
        assert_eq!(
            Route::resolve(&Method::POST, Some("profile")),
            Route::Operation(Operation::UpsertProfile)
        );
        assert_eq!(
            Route::resolve(&Method::PUT, Some("stats")),
            Route::Operation(Operation::UpdateStats)
        );
        assert_eq!(
            Route::resolve(&Method::GET, Some("achievement")),
            Route::NotFound
        );
        assert_eq!(Route::resolve(&Method::POST, Some("stats")), Route::NotFound);
        assert_eq!(Route::resolve(&Method::DELETE, Some("game")), Route::NotFound);
        assert_eq!(Route::resolve(&Method::GET, None), Route::NotFound);
    }

    #[test]
    fn test_options_ignores_the_action() {
        assert_eq!(Route::resolve(&Method::OPTIONS, None), Route::Preflight);
        assert_eq!(
            Route::resolve(&Method::OPTIONS, Some("nonsense")),
            Route::Preflight
        );
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Probe {
        #[serde(default)]
        name: Option<String>,
    }

    #[test]
    fn test_parse_body_defaults_on_empty_input() {
        let empty: Probe = parse_body(&Bytes::from_static(b"  \n")).unwrap();
        assert_eq!(empty, Probe::default());

        let named: Probe = parse_body(&Bytes::from_static(br#"{"name":"Bob"}"#)).unwrap();
        assert_eq!(named.name.as_deref(), Some("Bob"));

        let broken = parse_body::<Probe>(&Bytes::from_static(b"{oops"));
        assert!(matches!(broken, Err(ServiceError::Internal(_))));
    }

    #[test]
    fn test_preflight_headers() {
        let response = GameResponse::preflight().into_response();
        let headers = response.headers();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, OPTIONS"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
        assert!(headers.get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_errors_render_as_json_with_cors() {
        let response = GameResponse::from(AppError::route_not_found()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
