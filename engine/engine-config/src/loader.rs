//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",      // Current directory
    "../config.toml",   // Parent directory (when running from subdirectory)
    "/app/config.toml", // Docker container
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by ARCADE_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
/// 4. Docker container path (/app/config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var("ARCADE_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from ARCADE_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "ARCADE_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// An unreadable or malformed file falls back to the built-in defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u16, u64, usize, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = v,
            Ok(Err(_)) => warn!(key = $key, "Ignoring unparseable environment override"),
            Err(_) => {}
        }
    };
    // Optional string field, empty value clears it
    ($config:expr, $section:ident . $field:ident, $key:expr, optional) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = if v.is_empty() { None } else { Some(v) };
        }
    };
    // Comma-separated list
    ($config:expr, $section:ident . $field:ident, $key:expr, list) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: ARCADE_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.data_dir, "ARCADE_COMMON_DATA_DIR");
    env_override!(config, common.log_level, "ARCADE_COMMON_LOG_LEVEL");

    // Web
    env_override!(config, web.host, "ARCADE_WEB_HOST");
    env_override!(config, web.port, "ARCADE_WEB_PORT", parse);
    env_override!(
        config,
        web.allowed_origins,
        "ARCADE_WEB_ALLOWED_ORIGINS",
        list
    );

    // Storage
    env_override!(config, storage.db_file, "ARCADE_STORAGE_DB_FILE");
    env_override!(
        config,
        storage.user_agent,
        "ARCADE_STORAGE_USER_AGENT",
        optional
    );

    // Games
    env_override!(config, games.default_game, "ARCADE_GAMES_DEFAULT_GAME");
    env_override!(
        config,
        games.dominoes_players,
        "ARCADE_GAMES_DOMINOES_PLAYERS",
        parse
    );
    env_override!(
        config,
        games.dominoes_shuffle_seed,
        "ARCADE_GAMES_DOMINOES_SHUFFLE_SEED",
        parse
    );
    env_override!(
        config,
        games.checkers_ai_delay_ms,
        "ARCADE_GAMES_CHECKERS_AI_DELAY_MS",
        parse
    );
    env_override!(
        config,
        games.dominoes_ai_delay_ms,
        "ARCADE_GAMES_DOMINOES_AI_DELAY_MS",
        parse
    );
    env_override!(
        config,
        games.runaway_max_actions,
        "ARCADE_GAMES_RUNAWAY_MAX_ACTIONS",
        parse
    );
    env_override!(
        config,
        games.runaway_window_ms,
        "ARCADE_GAMES_RUNAWAY_WINDOW_MS",
        parse
    );

    config
}
