//! Game registry mapping env_id to factories
//!
//! The registry is a plain value built once at startup and handed to whoever
//! needs to create games (the HTTP server keeps it in its shared state).

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use crate::erased::ErasedGame;
use crate::metadata::GameMetadata;

/// Factory closure for creating game instances
///
/// Closures rather than `fn` pointers so that a factory can capture options
/// read from configuration (e.g. the number of dominoes players).
pub type GameFactory = Box<dyn Fn() -> Box<dyn ErasedGame> + Send + Sync>;

/// Registry mapping env_id to game factory functions
#[derive(Default)]
pub struct Registry {
    factories: BTreeMap<String, GameFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a game factory under `env_id`
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut registry = Registry::new();
    /// registry.register("snake", || Box::new(GameAdapter::new(Snake::default())));
    /// assert!(registry.is_registered("snake"));
    /// ```
    pub fn register<F>(&mut self, env_id: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn ErasedGame> + Send + Sync + 'static,
    {
        let env_id = env_id.into();
        if self.factories.contains_key(&env_id) {
            warn!(env_id = %env_id, "Overriding existing game registration");
        }
        self.factories.insert(env_id, Box::new(factory));
    }

    /// Create a new game instance by env_id
    ///
    /// Returns `None` if the env_id is not registered.
    pub fn create(&self, env_id: &str) -> Option<Box<dyn ErasedGame>> {
        match self.factories.get(env_id) {
            Some(factory) => Some(factory()),
            None => {
                warn!(env_id = %env_id, "Requested unknown game");
                None
            }
        }
    }

    /// Check if a game is registered
    pub fn is_registered(&self, env_id: &str) -> bool {
        self.factories.contains_key(env_id)
    }

    /// List all registered env_ids in sorted order
    pub fn list(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Metadata for one registered game
    pub fn metadata(&self, env_id: &str) -> Option<GameMetadata> {
        self.factories.get(env_id).map(|factory| factory().metadata())
    }

    /// Metadata for every registered game, sorted by env_id
    pub fn all_metadata(&self) -> Vec<GameMetadata> {
        self.factories
            .values()
            .map(|factory| factory().metadata())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("games", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
