use sqlx::PgPool;
use tracing::info;

use crate::dao::models::achievement_catalog;

use super::error::{PostgresDaoError, PostgresResult};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    id          SERIAL PRIMARY KEY,
    username    VARCHAR(50) UNIQUE NOT NULL,
    rating      INTEGER NOT NULL DEFAULT 1200,
    total_games INTEGER NOT NULL DEFAULT 0,
    wins        INTEGER NOT NULL DEFAULT 0,
    losses      INTEGER NOT NULL DEFAULT 0,
    draws       INTEGER NOT NULL DEFAULT 0,
    created_at  TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
    last_login  TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_players_rating ON players (rating DESC);

CREATE TABLE IF NOT EXISTS games (
    id              SERIAL PRIMARY KEY,
    white_player_id INTEGER REFERENCES players(id),
    black_player_id INTEGER REFERENCES players(id),
    game_mode       VARCHAR(20) NOT NULL DEFAULT 'local',
    bot_difficulty  INTEGER,
    status          VARCHAR(20) NOT NULL DEFAULT 'active',
    winner          VARCHAR(20),
    moves_json      JSONB NOT NULL DEFAULT '[]'::jsonb,
    board_state     JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at      TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
    completed_at    TIMESTAMPTZ
);

CREATE TABLE IF NOT EXISTS achievements (
    id                SERIAL PRIMARY KEY,
    name              VARCHAR(100) NOT NULL,
    description       TEXT NOT NULL,
    icon              VARCHAR(50) NOT NULL,
    category          VARCHAR(50) NOT NULL,
    requirement_value INTEGER NOT NULL DEFAULT 1,
    points            INTEGER NOT NULL DEFAULT 10
);

CREATE TABLE IF NOT EXISTS player_achievements (
    id             SERIAL PRIMARY KEY,
    player_id      INTEGER NOT NULL REFERENCES players(id),
    achievement_id INTEGER NOT NULL REFERENCES achievements(id),
    unlocked_at    TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (player_id, achievement_id)
);
"#;

/// Create the tables used by the store and seed the achievement catalog.
pub async fn apply(pool: &PgPool) -> PostgresResult<()> {
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await
        .map_err(|source| PostgresDaoError::Schema { source })?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|source| PostgresDaoError::Begin { source })?;

    for achievement in achievement_catalog() {
        sqlx::query(
            "INSERT INTO achievements (id, name, description, icon, category, requirement_value, points) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(achievement.id)
        .bind(&achievement.name)
        .bind(&achievement.description)
        .bind(&achievement.icon)
        .bind(&achievement.category)
        .bind(achievement.requirement_value)
        .bind(achievement.points)
        .execute(&mut *tx)
        .await
        .map_err(|source| PostgresDaoError::Schema { source })?;
    }

    // Explicit ids above do not advance the serial sequence.
    sqlx::query(
        "SELECT setval(pg_get_serial_sequence('achievements', 'id'), \
         (SELECT COALESCE(MAX(id), 1) FROM achievements))",
    )
    .execute(&mut *tx)
    .await
    .map_err(|source| PostgresDaoError::Schema { source })?;

    tx.commit()
        .await
        .map_err(|source| PostgresDaoError::Commit { source })?;

    info!("database schema ensured");
    Ok(())
}
