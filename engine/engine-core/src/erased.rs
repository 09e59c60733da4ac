//! Erased Game interface for runtime polymorphism
//!
//! This trait provides a JSON-only interface for runtime polymorphism
//! without generics. All typed games are converted to this interface via the
//! adapter layer, enabling dynamic dispatch from the registry and the HTTP
//! session host.

use rand_chacha::ChaCha20Rng;
use serde_json::Value;

use crate::event::GameEvent;
use crate::metadata::GameMetadata;
use crate::typed::RuleError;

/// Runtime error for erased game operations
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unknown game: {0}")]
    UnknownGame(String),
}

impl EngineError {
    /// Rule rejections are the player's fault; everything else is ours.
    pub fn is_rule_violation(&self) -> bool {
        matches!(self, EngineError::Rule(_))
    }
}

/// Erased game trait that works only with JSON values
///
/// State and input cross this boundary as `serde_json::Value`, which is also
/// the representation the HTTP layer speaks, so a session can hold any game
/// without knowing its types.
///
/// # Example Usage
///
/// ```rust,ignore
/// fn play_one(game: &dyn ErasedGame, rng: &mut ChaCha20Rng) -> Result<(), EngineError> {
///     let mut state = game.initialize(rng)?;
///     let events = game.apply_input(&mut state, &serde_json::json!("tick"), rng)?;
///     println!("{} events, terminal: {}", events.len(), game.is_terminal(&state)?);
///     Ok(())
/// }
/// ```
pub trait ErasedGame: Send + Sync + std::fmt::Debug + 'static {
    /// Get game metadata for UI and configuration
    fn metadata(&self) -> GameMetadata;

    /// Build and encode the initial state
    fn initialize(&self, rng: &mut ChaCha20Rng) -> Result<Value, EngineError>;

    /// Apply one encoded input to an encoded state
    ///
    /// On error `state` is left untouched.
    fn apply_input(
        &self,
        state: &mut Value,
        input: &Value,
        rng: &mut ChaCha20Rng,
    ) -> Result<Vec<GameEvent>, EngineError>;

    /// Whether the encoded state is terminal
    fn is_terminal(&self, state: &Value) -> Result<bool, EngineError>;

    /// Encoded computer input for this state, if it is the computer's turn
    fn bot_input(&self, state: &Value, rng: &mut ChaCha20Rng)
        -> Result<Option<Value>, EngineError>;

    /// Encoded log snapshot of the state
    fn snapshot(&self, state: &Value) -> Result<Value, EngineError>;
}
