use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod achievement;
pub mod common;
pub mod game;
pub mod health;
pub mod leaderboard;
pub mod profile;
pub mod stats;

/// Render a stored timestamp as an RFC 3339 (ISO-8601) string.
fn format_timestamp(time: OffsetDateTime) -> String {
    time.format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
