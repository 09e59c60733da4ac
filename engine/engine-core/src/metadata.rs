//! Game metadata for UI and configuration
//!
//! This module provides display-oriented metadata about games that can be
//! used by frontends and the session host to configure themselves dynamically.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata about a game for UI display and configuration
///
/// This struct contains all the information needed to:
/// - Display the game in a UI (board dimensions, player names)
/// - Drive timer-based games (tick interval)
/// - Tell a client which input kinds the game accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMetadata {
    /// Environment identifier (e.g., "snake", "dominoes")
    pub env_id: String,

    /// Human-readable display name (e.g., "Snake", "Checkers")
    pub display_name: String,

    /// Board width in cells (0 for games without a grid)
    pub board_width: usize,

    /// Board height in cells (0 for games without a grid)
    pub board_height: usize,

    /// Number of seats at the table
    pub player_count: usize,

    /// Display names for each seat (e.g., ["Player", "Computer"])
    pub player_names: Vec<String>,

    /// Milliseconds between automatic ticks, for timer-driven games
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_interval_ms: Option<u64>,

    /// Brief description of the game rules for UI tooltips
    pub description: String,

    /// `kind` tags of the inputs `apply_input` accepts
    pub input_kinds: Vec<String>,

    /// `kind` tags reserved for computer seats; the session host issues
    /// these itself and refuses them from clients
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bot_input_kinds: Vec<String>,
}

impl GameMetadata {
    /// Create a new GameMetadata with required fields
    pub fn new(env_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            env_id: env_id.into(),
            display_name: display_name.into(),
            board_width: 0,
            board_height: 0,
            player_count: 1,
            player_names: vec!["Player".to_string()],
            tick_interval_ms: None,
            description: String::new(),
            input_kinds: Vec::new(),
            bot_input_kinds: Vec::new(),
        }
    }

    /// Builder method for board dimensions
    pub fn with_board(mut self, width: usize, height: usize) -> Self {
        self.board_width = width;
        self.board_height = height;
        self
    }

    /// Builder method for player information
    pub fn with_players(mut self, names: Vec<String>) -> Self {
        self.player_count = names.len();
        self.player_names = names;
        self
    }

    /// Builder method for the automatic tick interval
    pub fn with_tick_interval(mut self, millis: u64) -> Self {
        self.tick_interval_ms = Some(millis);
        self
    }

    /// Builder method for description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method for accepted input kinds
    pub fn with_inputs(mut self, kinds: &[&str]) -> Self {
        self.input_kinds = kinds.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Builder method for the input kinds only computer seats may use
    pub fn with_bot_inputs(mut self, kinds: &[&str]) -> Self {
        self.bot_input_kinds = kinds.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Whether `input` is tagged with a computer-only kind
    pub fn is_bot_input(&self, input: &Value) -> bool {
        input
            .get("kind")
            .and_then(Value::as_str)
            .is_some_and(|kind| self.bot_input_kinds.iter().any(|k| k == kind))
    }

    /// Get the total number of board cells
    pub fn board_size(&self) -> usize {
        self.board_width * self.board_height
    }

    /// Whether the game advances on a timer rather than only on player input
    pub fn is_timed(&self) -> bool {
        self.tick_interval_ms.is_some()
    }
}
