//! Adapter layer converting typed games to erased interface
//!
//! This module provides the `GameAdapter` struct that automatically converts
//! any typed `Game` implementation to the `ErasedGame` interface, handling
//! all JSON encoding/decoding.

use rand_chacha::ChaCha20Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::erased::{EngineError, ErasedGame};
use crate::event::GameEvent;
use crate::metadata::GameMetadata;
use crate::typed::Game;

/// Adapter that converts typed games to erased interface
///
/// The state is decoded from JSON on every call and only written back after a
/// successful transition, so a rejected input (or a decode failure) leaves the
/// caller's encoded state untouched.
///
/// # Example
///
/// ```rust,ignore
/// let erased: Box<dyn ErasedGame> = Box::new(GameAdapter::new(Snake::default()));
/// println!("Game: {}", erased.metadata().display_name);
/// ```
#[derive(Debug)]
pub struct GameAdapter<T: Game> {
    game: T,
}

impl<T: Game> GameAdapter<T> {
    /// Create a new adapter wrapping the given game
    pub fn new(game: T) -> Self {
        Self { game }
    }

    /// Get a reference to the underlying game
    pub fn game(&self) -> &T {
        &self.game
    }

    /// Consume the adapter and return the underlying game
    pub fn into_inner(self) -> T {
        self.game
    }
}

fn decode<V: DeserializeOwned>(value: &Value, what: &'static str) -> Result<V, EngineError> {
    V::deserialize(value).map_err(|source| EngineError::Decode { what, source })
}

fn encode<V: Serialize>(value: &V, what: &'static str) -> Result<Value, EngineError> {
    serde_json::to_value(value).map_err(|source| EngineError::Encode { what, source })
}

impl<T: Game> ErasedGame for GameAdapter<T> {
    fn metadata(&self) -> GameMetadata {
        self.game.metadata()
    }

    fn initialize(&self, rng: &mut ChaCha20Rng) -> Result<Value, EngineError> {
        let state = self.game.initialize(rng);
        encode(&state, "state")
    }

    fn apply_input(
        &self,
        state: &mut Value,
        input: &Value,
        rng: &mut ChaCha20Rng,
    ) -> Result<Vec<GameEvent>, EngineError> {
        let mut typed_state: T::State = decode(state, "state")?;
        let typed_input: T::Input = decode(input, "input")?;

        let events = self.game.apply_input(&mut typed_state, typed_input, rng)?;

        *state = encode(&typed_state, "state")?;
        Ok(events)
    }

    fn is_terminal(&self, state: &Value) -> Result<bool, EngineError> {
        let typed_state: T::State = decode(state, "state")?;
        Ok(self.game.is_terminal(&typed_state))
    }

    fn bot_input(
        &self,
        state: &Value,
        rng: &mut ChaCha20Rng,
    ) -> Result<Option<Value>, EngineError> {
        let typed_state: T::State = decode(state, "state")?;
        self.game
            .bot_input(&typed_state, rng)
            .map(|input| encode(&input, "input"))
            .transpose()
    }

    fn snapshot(&self, state: &Value) -> Result<Value, EngineError> {
        let typed_state: T::State = decode(state, "state")?;
        encode(&self.game.snapshot(&typed_state), "snapshot")
    }
}
