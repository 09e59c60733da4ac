//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_data_dir() -> String {
    defaults::data_dir().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_host() -> String {
    defaults::host().into()
}
fn d_port() -> u16 {
    defaults::port()
}
fn d_allowed_origins() -> Vec<String> {
    defaults::allowed_origins().to_vec()
}
fn d_db_file() -> String {
    defaults::db_file().into()
}
fn d_user_agent() -> Option<String> {
    Some(defaults::user_agent().into())
}
fn d_default_game() -> String {
    defaults::default_game().into()
}
fn d_dominoes_players() -> usize {
    defaults::dominoes_players()
}
fn d_shuffle_seed() -> u64 {
    defaults::dominoes_shuffle_seed()
}
fn d_checkers_delay() -> u64 {
    defaults::checkers_ai_delay_ms()
}
fn d_dominoes_delay() -> u64 {
    defaults::dominoes_ai_delay_ms()
}
fn d_runaway_max() -> usize {
    defaults::runaway_max_actions()
}
fn d_runaway_window() -> u64 {
    defaults::runaway_window_ms()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub games: GamesConfig,
}

impl CentralConfig {
    /// Location of the log database
    ///
    /// An absolute `storage.db_file` is used as is; a relative one lives
    /// under `common.data_dir`.
    pub fn db_path(&self) -> PathBuf {
        let file = PathBuf::from(&self.storage.db_file);
        if file.is_absolute() {
            file
        } else {
            PathBuf::from(&self.common.data_dir).join(file)
        }
    }
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_data_dir")]
    pub data_dir: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir().into(),
            log_level: defaults::log_level().into(),
        }
    }
}

/// Web server configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WebConfig {
    #[serde(default = "d_host")]
    pub host: String,
    #[serde(default = "d_port")]
    pub port: u16,
    /// CORS allowed origins. Empty = allow all origins (development mode with warning).
    #[serde(default = "d_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: defaults::host().into(),
            port: defaults::port(),
            allowed_origins: defaults::allowed_origins().to_vec(),
        }
    }
}

/// Log database configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(default = "d_db_file")]
    pub db_file: String,
    /// Recorded on every log written by the session host (None = omit)
    #[serde(default = "d_user_agent")]
    pub user_agent: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file: defaults::db_file().into(),
            user_agent: Some(defaults::user_agent().into()),
        }
    }
}

/// Game session configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GamesConfig {
    /// Game started by `POST /game/new` when no game is named
    #[serde(default = "d_default_game")]
    pub default_game: String,
    #[serde(default = "d_dominoes_players")]
    pub dominoes_players: usize,
    #[serde(default = "d_shuffle_seed")]
    pub dominoes_shuffle_seed: u64,
    /// Thinking pause before each computer checkers move
    #[serde(default = "d_checkers_delay")]
    pub checkers_ai_delay_ms: u64,
    /// Thinking pause before each AI dominoes move
    #[serde(default = "d_dominoes_delay")]
    pub dominoes_ai_delay_ms: u64,
    /// Automated actions allowed inside one runaway window
    #[serde(default = "d_runaway_max")]
    pub runaway_max_actions: usize,
    #[serde(default = "d_runaway_window")]
    pub runaway_window_ms: u64,
}

impl GamesConfig {
    /// Thinking pause for the computer side of `env_id`
    pub fn ai_delay(&self, env_id: &str) -> Duration {
        match env_id {
            "checkers" => Duration::from_millis(self.checkers_ai_delay_ms),
            "dominoes" => Duration::from_millis(self.dominoes_ai_delay_ms),
            _ => Duration::ZERO,
        }
    }

    pub fn runaway_window(&self) -> Duration {
        Duration::from_millis(self.runaway_window_ms)
    }
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self {
            default_game: defaults::default_game().into(),
            dominoes_players: defaults::dominoes_players(),
            dominoes_shuffle_seed: defaults::dominoes_shuffle_seed(),
            checkers_ai_delay_ms: defaults::checkers_ai_delay_ms(),
            dominoes_ai_delay_ms: defaults::dominoes_ai_delay_ms(),
            runaway_max_actions: defaults::runaway_max_actions(),
            runaway_window_ms: defaults::runaway_window_ms(),
        }
    }
}
