/// Achievement catalog listing and unlocks.
pub mod achievement_service;
/// `(method, action)` routing and response shaping.
pub mod dispatcher;
/// OpenAPI documentation generation.
pub mod documentation;
/// Game record persistence.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Rating leaderboard.
pub mod leaderboard_service;
/// Player profile lookup and upsert.
pub mod profile_service;
/// Post-game statistics updates.
pub mod stats_service;
