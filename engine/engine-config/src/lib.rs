//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! across all Rust components (game host, log service).
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`ARCADE_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! ARCADE_<SECTION>_<KEY>=value
//!
//! Examples:
//!     ARCADE_COMMON_DATA_DIR=/data
//!     ARCADE_WEB_PORT=3000
//!     ARCADE_STORAGE_DB_FILE=/var/lib/arcade/game-logs.db
//!     ARCADE_GAMES_DOMINOES_PLAYERS=2
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;

#[cfg(test)]
mod tests;
