//! Typed Game trait providing ergonomic interface for rule-engine developers
//!
//! This trait allows game implementations to work with strongly-typed state,
//! input, and snapshot types while maintaining compile-time type safety. The
//! session host never sees these types directly; it goes through the erased
//! JSON interface produced by `GameAdapter`.

use std::fmt::Debug;

use rand_chacha::ChaCha20Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::event::GameEvent;
use crate::metadata::GameMetadata;

/// Main trait for game implementations
///
/// A game is a pure state-transition function: `apply_input` takes the current
/// state and one input (a player command or a timer tick), mutates the state in
/// place and returns the events the transition produced. A rejected input must
/// return a `RuleError` *before* touching the state, so callers can rely on a
/// failed call leaving the state exactly as it was.
///
/// # Type Parameters
///
/// * `State` - Full game state, serde-encodable so it can cross the erased boundary
/// * `Input` - Player command or tick, usually a small tagged enum
/// * `Snapshot` - Compact summary attached to logged events
///
/// # Example
///
/// ```rust
/// # use engine_core::{Game, GameEvent, GameMetadata, RuleError};
/// # use rand_chacha::ChaCha20Rng;
/// # use serde::{Deserialize, Serialize};
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct CounterState {
///     value: u32,
/// }
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// enum CounterInput {
///     Add(u32),
/// }
///
/// #[derive(Debug)]
/// struct Counter;
///
/// impl Game for Counter {
///     type State = CounterState;
///     type Input = CounterInput;
///     type Snapshot = u32;
///
///     fn metadata(&self) -> GameMetadata {
///         GameMetadata::new("counter", "Counter")
///     }
///
///     fn initialize(&self, _rng: &mut ChaCha20Rng) -> CounterState {
///         CounterState { value: 0 }
///     }
///
///     fn apply_input(
///         &self,
///         state: &mut CounterState,
///         input: CounterInput,
///         _rng: &mut ChaCha20Rng,
///     ) -> Result<Vec<GameEvent>, RuleError> {
///         let CounterInput::Add(n) = input;
///         state.value += n;
///         Ok(Vec::new())
///     }
///
///     fn is_terminal(&self, state: &CounterState) -> bool {
///         state.value >= 10
///     }
///
///     fn snapshot(&self, state: &CounterState) -> u32 {
///         state.value
///     }
/// }
/// ```
pub trait Game: Send + Sync + Debug + 'static {
    /// Full game state
    type State: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static;

    /// Player command or timer tick
    type Input: Serialize + DeserializeOwned + Debug + Send + Sync + 'static;

    /// Summary attached to logged events as `gameState`
    type Snapshot: Serialize;

    /// Get game metadata for UI and configuration
    fn metadata(&self) -> GameMetadata;

    /// Build the initial state
    ///
    /// Any randomness (food placement, first piece, shuffles) must come from
    /// `rng` so that a seeded session replays identically.
    fn initialize(&self, rng: &mut ChaCha20Rng) -> Self::State;

    /// Apply one input to the state
    ///
    /// # Errors
    ///
    /// Returns `RuleError` when the input is not legal in the current state.
    /// The state is left unmodified in that case.
    fn apply_input(
        &self,
        state: &mut Self::State,
        input: Self::Input,
        rng: &mut ChaCha20Rng,
    ) -> Result<Vec<GameEvent>, RuleError>;

    /// Whether the game has ended
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Input the computer side wants to play next, if it is the computer's turn
    fn bot_input(&self, _state: &Self::State, _rng: &mut ChaCha20Rng) -> Option<Self::Input> {
        None
    }

    /// Summary of the state for log records
    fn snapshot(&self, state: &Self::State) -> Self::Snapshot;
}

/// Gameplay invariant violations
///
/// These are expected, user-facing rejections (the player pressed the wrong
/// key, clicked an empty square...) rather than engine faults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Cell ({x}, {y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },
    #[error("Illegal move: {0}")]
    IllegalMove(String),
    #[error("It is not {0}'s turn")]
    NotYourTurn(String),
    #[error("Game is paused")]
    Paused,
    #[error("Game is over")]
    GameOver,
}

impl RuleError {
    pub fn illegal(reason: impl Into<String>) -> Self {
        RuleError::IllegalMove(reason.into())
    }
}
