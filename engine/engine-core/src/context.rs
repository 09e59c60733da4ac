//! Engine context providing a high-level API for running one game
//!
//! This module provides `EngineContext`, a convenient wrapper that owns an
//! erased game, its current encoded state, and the seeded RNG driving it, so
//! callers never juggle state values or registry lookups themselves.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde_json::Value;
use tracing::debug;

use crate::erased::{EngineError, ErasedGame};
use crate::event::GameEvent;
use crate::metadata::GameMetadata;
use crate::registry::Registry;

/// High-level context for one running game
///
/// # Example
///
/// ```rust,ignore
/// use engine_core::EngineContext;
///
/// let mut ctx = EngineContext::new(&registry, "snake", 42)?;
/// let result = ctx.apply(&serde_json::json!({"kind": "tick"}))?;
/// println!("{} events, terminal: {}", result.events.len(), result.terminal);
/// ```
#[derive(Debug)]
pub struct EngineContext {
    game: Box<dyn ErasedGame>,
    state: Value,
    rng: ChaCha20Rng,
    seed: u64,
}

/// Result of applying one input
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Events produced by the transition, in emission order
    pub events: Vec<GameEvent>,
    /// Whether the game has ended after this input
    pub terminal: bool,
}

impl EngineContext {
    /// Create a context for a registered game and initialize its state
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownGame` if `env_id` is not registered.
    pub fn new(registry: &Registry, env_id: &str, seed: u64) -> Result<Self, EngineError> {
        let game = registry
            .create(env_id)
            .ok_or_else(|| EngineError::UnknownGame(env_id.to_string()))?;
        Self::from_game(game, seed)
    }

    /// Create a context from an existing game instance
    pub fn from_game(game: Box<dyn ErasedGame>, seed: u64) -> Result<Self, EngineError> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let state = game.initialize(&mut rng)?;
        debug!(env_id = %game.metadata().env_id, seed, "Engine context created");
        Ok(Self {
            game,
            state,
            rng,
            seed,
        })
    }

    /// Re-initialize the game, continuing the same RNG stream
    pub fn reset(&mut self) -> Result<(), EngineError> {
        self.state = self.game.initialize(&mut self.rng)?;
        Ok(())
    }

    /// Apply one encoded input
    ///
    /// On error the current state is unchanged.
    pub fn apply(&mut self, input: &Value) -> Result<StepResult, EngineError> {
        let events = self
            .game
            .apply_input(&mut self.state, input, &mut self.rng)?;
        let terminal = self.game.is_terminal(&self.state)?;
        Ok(StepResult { events, terminal })
    }

    /// The input the computer side would play now, if any
    pub fn bot_input(&mut self) -> Result<Option<Value>, EngineError> {
        self.game.bot_input(&self.state, &mut self.rng)
    }

    pub fn is_terminal(&self) -> Result<bool, EngineError> {
        self.game.is_terminal(&self.state)
    }

    /// Current encoded state
    pub fn state(&self) -> &Value {
        &self.state
    }

    pub fn snapshot(&self) -> Result<Value, EngineError> {
        self.game.snapshot(&self.state)
    }

    pub fn metadata(&self) -> GameMetadata {
        self.game.metadata()
    }

    pub fn env_id(&self) -> String {
        self.game.metadata().env_id
    }

    /// Seed the context was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::GameAdapter;
    use crate::event::{EventCategory, Severity};
    use crate::typed::{Game, RuleError};
    use rand::Rng;
    use serde_json::json;

    // Start somewhere in 0..5, add 1..=4 per input, finished at 10
    #[derive(Debug, Default)]
    struct SimpleGame;

    impl Game for SimpleGame {
        type State = u32;
        type Input = u32;
        type Snapshot = u32;

        fn metadata(&self) -> GameMetadata {
            GameMetadata::new("simple", "Simple")
        }

        fn initialize(&self, rng: &mut ChaCha20Rng) -> u32 {
            rng.gen_range(0..5)
        }

        fn apply_input(
            &self,
            state: &mut u32,
            input: u32,
            _rng: &mut ChaCha20Rng,
        ) -> Result<Vec<GameEvent>, RuleError> {
            if *state >= 10 {
                return Err(RuleError::GameOver);
            }
            if !(1..=4).contains(&input) {
                return Err(RuleError::illegal("step must be 1..=4"));
            }
            *state += input;
            Ok(vec![GameEvent::info(
                Severity::Low,
                EventCategory::GameMechanics,
                "step",
            )])
        }

        fn is_terminal(&self, state: &u32) -> bool {
            *state >= 10
        }

        fn bot_input(&self, state: &u32, rng: &mut ChaCha20Rng) -> Option<u32> {
            (*state < 10).then(|| rng.gen_range(1..=4))
        }

        fn snapshot(&self, state: &u32) -> u32 {
            *state
        }
    }

    fn setup_registry() -> Registry {
        let mut registry = Registry::new();
        registry.register("simple", || Box::new(GameAdapter::new(SimpleGame)));
        registry
    }

    #[test]
    fn test_context_creation() {
        let registry = setup_registry();

        let ctx = EngineContext::new(&registry, "simple", 42).unwrap();

        assert_eq!(ctx.env_id(), "simple");
        assert_eq!(ctx.seed(), 42);
        assert!(ctx.state().as_u64().unwrap() < 5);
    }

    #[test]
    fn test_context_nonexistent_game() {
        let registry = setup_registry();

        let err = EngineContext::new(&registry, "nonexistent", 42).unwrap_err();

        assert!(matches!(err, EngineError::UnknownGame(id) if id == "nonexistent"));
    }

    #[test]
    fn test_context_apply() {
        let registry = setup_registry();
        let mut ctx = EngineContext::new(&registry, "simple", 42).unwrap();
        let before = ctx.state().as_u64().unwrap();

        let result = ctx.apply(&json!(3)).unwrap();

        assert_eq!(result.events.len(), 1);
        assert!(!result.terminal);
        assert_eq!(ctx.state().as_u64().unwrap(), before + 3);
    }

    #[test]
    fn test_context_rejected_input_keeps_state() {
        let registry = setup_registry();
        let mut ctx = EngineContext::new(&registry, "simple", 42).unwrap();
        let before = ctx.state().clone();

        assert!(ctx.apply(&json!(9)).is_err());
        assert!(ctx.apply(&json!("three")).is_err());
        assert_eq!(ctx.state(), &before);
    }

    #[test]
    fn test_context_same_seed_same_game() {
        let registry = setup_registry();

        for seed in [0u64, 42, 12345, u64::MAX] {
            let mut a = EngineContext::new(&registry, "simple", seed).unwrap();
            let mut b = EngineContext::new(&registry, "simple", seed).unwrap();
            assert_eq!(a.state(), b.state());
            assert_eq!(a.bot_input().unwrap(), b.bot_input().unwrap());
        }
    }

    #[test]
    fn test_context_bot_plays_to_completion() {
        let registry = setup_registry();
        let mut ctx = EngineContext::new(&registry, "simple", 7).unwrap();
        let mut steps = 0;

        while let Some(input) = ctx.bot_input().unwrap() {
            ctx.apply(&input).unwrap();
            steps += 1;
            assert!(steps <= 10);
        }

        assert!(ctx.is_terminal().unwrap());
        assert!(ctx.snapshot().unwrap().as_u64().unwrap() >= 10);
    }

    #[test]
    fn test_context_reset() {
        let registry = setup_registry();
        let mut ctx = EngineContext::new(&registry, "simple", 1).unwrap();
        while let Some(input) = ctx.bot_input().unwrap() {
            ctx.apply(&input).unwrap();
        }

        ctx.reset().unwrap();

        assert!(!ctx.is_terminal().unwrap());
        assert!(ctx.state().as_u64().unwrap() < 5);
    }
}
