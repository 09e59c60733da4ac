//! Game registration for the arcade server
//!
//! Single place that knows every game crate. The server builds one
//! [`Registry`] at startup with [`build_registry`] and keeps it in its state.
//!
//! # Usage
//!
//! ```rust
//! use engine_games::{build_registry, GameOptions};
//!
//! let registry = build_registry(&GameOptions::default());
//! assert!(registry.is_registered("tetris"));
//! ```

use engine_core::{GameAdapter, Registry};
use games_checkers::Checkers;
use games_dominoes::Dominoes;
use games_snake::Snake;
use games_tetris::Tetris;
use tracing::debug;

/// Knobs that shape how games are constructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOptions {
    /// Seats at the dominoes table, 2..=4
    pub dominoes_players: usize,
    /// Seed of the deterministic dominoes deal
    pub dominoes_shuffle_seed: u64,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            dominoes_players: games_dominoes::DEFAULT_PLAYERS,
            dominoes_shuffle_seed: games_dominoes::DEFAULT_SHUFFLE_SEED,
        }
    }
}

/// Register every available game into `registry`
///
/// Currently registers:
/// - Snake (`"snake"`)
/// - Tetris (`"tetris"`)
/// - Checkers (`"checkers"`)
/// - Dominoes (`"dominoes"`)
pub fn register_all_games(registry: &mut Registry, options: &GameOptions) {
    registry.register("snake", || Box::new(GameAdapter::new(Snake::new())));
    registry.register("tetris", || Box::new(GameAdapter::new(Tetris::new())));
    registry.register("checkers", || Box::new(GameAdapter::new(Checkers::new())));

    let players = options.dominoes_players;
    let seed = options.dominoes_shuffle_seed;
    registry.register("dominoes", move || {
        Box::new(GameAdapter::new(
            Dominoes::new(players).with_shuffle_seed(seed),
        ))
    });

    debug!(games = registry.len(), "Registered games");
}

/// A registry holding every available game
pub fn build_registry(options: &GameOptions) -> Registry {
    let mut registry = Registry::new();
    register_all_games(&mut registry, options);
    registry
}
