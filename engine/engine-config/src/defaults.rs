//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time,
//! so the serde defaults and the documented defaults can never drift apart.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    web: WebDefaults,
    storage: StorageDefaults,
    games: GamesDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    data_dir: String,
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct WebDefaults {
    host: String,
    port: u16,
    allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct StorageDefaults {
    db_file: String,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct GamesDefaults {
    default_game: String,
    dominoes_players: usize,
    dominoes_shuffle_seed: u64,
    checkers_ai_delay_ms: u64,
    dominoes_ai_delay_ms: u64,
    runaway_max_actions: usize,
    runaway_window_ms: u64,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn data_dir() -> &'static str {
    &DEFAULTS.common.data_dir
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Web
pub fn host() -> &'static str {
    &DEFAULTS.web.host
}
pub fn port() -> u16 {
    DEFAULTS.web.port
}
pub fn allowed_origins() -> &'static [String] {
    &DEFAULTS.web.allowed_origins
}

// Storage
pub fn db_file() -> &'static str {
    &DEFAULTS.storage.db_file
}
pub fn user_agent() -> &'static str {
    &DEFAULTS.storage.user_agent
}

// Games
pub fn default_game() -> &'static str {
    &DEFAULTS.games.default_game
}
pub fn dominoes_players() -> usize {
    DEFAULTS.games.dominoes_players
}
pub fn dominoes_shuffle_seed() -> u64 {
    DEFAULTS.games.dominoes_shuffle_seed
}
pub fn checkers_ai_delay_ms() -> u64 {
    DEFAULTS.games.checkers_ai_delay_ms
}
pub fn dominoes_ai_delay_ms() -> u64 {
    DEFAULTS.games.dominoes_ai_delay_ms
}
pub fn runaway_max_actions() -> usize {
    DEFAULTS.games.runaway_max_actions
}
pub fn runaway_window_ms() -> u64 {
    DEFAULTS.games.runaway_window_ms
}
