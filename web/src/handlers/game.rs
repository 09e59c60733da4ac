//! Game-related handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::game::{record_events, GameSession};
use crate::types::{
    GameInfoResponse, GameStateResponse, GamesListResponse, InputRequest, InputResponse,
    NewGameRequest,
};
use crate::AppState;

/// List all available games.
pub async fn list_games(State(state): State<Arc<AppState>>) -> Json<GamesListResponse> {
    Json(GamesListResponse {
        games: state.registry.list(),
    })
}

/// Get metadata for a specific game.
pub async fn get_game_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GameInfoResponse>, ApiError> {
    state.registry.metadata(&id).map(Json).ok_or_else(|| {
        ApiError::not_found(format!(
            "Game not found: {}. Use /games to list available games.",
            id
        ))
    })
}

/// Get current game state.
pub async fn get_game_state(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GameStateResponse>, ApiError> {
    let session = state.session.lock().await;
    Ok(Json(session.to_response()?))
}

/// Start a new game, replacing the current session.
pub async fn new_game(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewGameRequest>, JsonRejection>,
) -> Result<Json<GameStateResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let game_id = req
        .game
        .unwrap_or_else(|| state.games.default_game.clone());

    // Build before locking so a bad id leaves the running game alone
    let fresh = GameSession::new(&state.registry, &game_id, req.seed, &state.games)?;
    let mut session = state.session.lock().await;
    *session = fresh;

    // Some games may open with a computer seat
    session.play_bot_turns(&state.emitter).await;

    Ok(Json(session.to_response()?))
}

/// Apply one player input, then let the computer seats reply.
pub async fn apply_input(
    State(state): State<Arc<AppState>>,
    body: Result<Json<InputRequest>, JsonRejection>,
) -> Result<Json<InputResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let mut session = state.session.lock().await;

    let mut events = session.apply_player_input(&req.input)?;
    record_events(&state.emitter, &events).await;

    // The player's move has landed; a computer failure is reported, not raised
    let bot = session.play_bot_turns(&state.emitter).await;
    events.extend(bot.events);

    Ok(Json(InputResponse {
        state: session.to_response()?,
        events,
        bot_moves: bot.moves,
        bot_error: bot.error,
    }))
}
