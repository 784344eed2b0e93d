use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the game data backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game_data::handle_game_data,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::ErrorBody,
            crate::dto::common::SuccessResponse,
            crate::dto::profile::ProfileRequest,
            crate::dto::profile::PlayerProfile,
            crate::dto::achievement::UnlockAchievementRequest,
            crate::dto::achievement::AchievementStatus,
            crate::dto::stats::UpdateStatsRequest,
            crate::dto::stats::PlayerStats,
            crate::dto::game::SaveGameRequest,
            crate::dto::game::GameSaved,
            crate::dto::leaderboard::LeaderboardEntry,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game-data", description = "Profiles, achievements, statistics, games and leaderboard"),
    )
)]
pub struct ApiDoc;
