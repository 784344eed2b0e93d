use serde_json::{Value, json};
use time::OffsetDateTime;
use tracing::debug;

use crate::{
    dao::models::{GameStatus, NewGameEntity},
    dto::{
        common::present_id,
        game::{DEFAULT_GAME_MODE, GameSaved, SaveGameRequest},
    },
    error::ServiceError,
    state::SharedState,
};

/// Persist a game record. Always inserts a new row.
pub async fn save_game(
    state: &SharedState,
    request: SaveGameRequest,
) -> Result<GameSaved, ServiceError> {
    let game = build_game(request, OffsetDateTime::now_utc())?;
    let store = state.require_store()?;

    let status = game.status;
    let game_id = store.save_game(game).await?;
    debug!(game_id, status = status.as_str(), "saved game");

    Ok(GameSaved { game_id })
}

fn build_game(request: SaveGameRequest, now: OffsetDateTime) -> Result<NewGameEntity, ServiceError> {
    let SaveGameRequest {
        white_player_id,
        black_player_id,
        game_mode,
        bot_difficulty,
        winner,
        moves,
        board_state,
    } = request;

    let winner = winner.filter(|winner| !winner.is_empty());
    let status = if winner.is_some() {
        GameStatus::Completed
    } else {
        GameStatus::Active
    };

    Ok(NewGameEntity {
        white_player_id: present_id(white_player_id.as_ref()).transpose()?,
        black_player_id: present_id(black_player_id.as_ref()).transpose()?,
        game_mode: game_mode.unwrap_or_else(|| DEFAULT_GAME_MODE.to_owned()),
        bot_difficulty,
        status,
        completed_at: winner.as_ref().map(|_| now),
        winner,
        moves: moves.unwrap_or_else(empty_list),
        board_state: board_state.unwrap_or_else(empty_list),
    })
}

fn empty_list() -> Value {
    json!([])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::common::FlexibleId;

    #[test]
    fn test_winner_completes_the_game() {
        let now = OffsetDateTime::UNIX_EPOCH;
        let game = build_game(
            SaveGameRequest {
                winner: Some("white".into()),
                ..SaveGameRequest::default()
            },
            now,
        )
        .unwrap();

        assert_eq!(game.status, GameStatus::Completed);
        assert_eq!(game.completed_at, Some(now));
        assert_eq!(game.game_mode, "local");
        assert_eq!(game.moves, json!([]));
        assert_eq!(game.board_state, json!([]));
    }

    #[test]
    fn test_empty_winner_keeps_the_game_active() {
        let game = build_game(
            SaveGameRequest {
                winner: Some(String::new()),
                game_mode: Some("bot".into()),
                bot_difficulty: Some(4),
                black_player_id: Some(FlexibleId::Text("9".into())),
                ..SaveGameRequest::default()
            },
            OffsetDateTime::UNIX_EPOCH,
        )
        .unwrap();

        assert_eq!(game.status, GameStatus::Active);
        assert_eq!(game.winner, None);
        assert_eq!(game.completed_at, None);
        assert_eq!(game.black_player_id, Some(9));
        assert_eq!(game.white_player_id, None);
    }

    #[test]
    fn test_moves_are_stored_verbatim() {
        let moves = json!([{"from": [1, 2], "to": [3, 4], "piece": "dragon"}]);
        let game = build_game(
            SaveGameRequest {
                moves: Some(moves.clone()),
                ..SaveGameRequest::default()
            },
            OffsetDateTime::UNIX_EPOCH,
        )
        .unwrap();

        assert_eq!(game.moves, moves);
    }
}
