use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod game_data;
pub mod health;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router().merge(game_data::router());

    let docs_router = docs::router(state.clone());

    api_router
        .merge(docs_router)
        .fallback(game_data::unmatched_path)
        .with_state(state)
}
