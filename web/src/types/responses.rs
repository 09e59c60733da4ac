//! Response types for the web API.

use engine_core::{GameEvent, GameMetadata};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of registered games
    pub games: usize,
}

/// List of available games.
#[derive(Serialize, Deserialize)]
pub struct GamesListResponse {
    pub games: Vec<String>,
}

/// Game metadata response.
pub type GameInfoResponse = GameMetadata;

/// Current game session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateResponse {
    /// env_id of the running game
    pub game: String,
    /// Seed the session RNG was created with
    pub seed: u64,
    /// Full game state, in the game's own encoding
    pub state: Value,
    /// Compact summary the game attaches to its log events
    pub snapshot: Value,
    pub game_over: bool,
    /// Computer play stopped by the runaway guard until the next new game
    pub automation_halted: bool,
}

/// Response after applying a player input.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputResponse {
    #[serde(flatten)]
    pub state: GameStateResponse,
    /// Events from the player's input and every computer move that followed
    pub events: Vec<GameEvent>,
    /// Number of computer moves played after the input
    pub bot_moves: usize,
    /// Why the computer stopped early, when a computer move failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_error: Option<String>,
}

/// Plain acknowledgement of a write.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            id: None,
        }
    }

    pub fn created(id: impl Into<String>) -> Self {
        Self {
            success: true,
            id: Some(id.into()),
        }
    }
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
