//! Tests for the configuration module.

use super::*;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.data_dir, "./data");
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.web.host, "0.0.0.0");
    assert_eq!(config.web.port, 8080);
    assert_eq!(config.storage.db_file, "game-logs.db");
    assert_eq!(config.storage.user_agent.as_deref(), Some("arcade-server"));
}

#[test]
fn test_games_defaults() {
    let config = CentralConfig::default();
    assert_eq!(config.games.default_game, "snake");
    assert_eq!(config.games.dominoes_players, 4);
    assert_eq!(config.games.runaway_max_actions, 5);
    assert_eq!(config.games.runaway_window(), Duration::from_millis(2000));
    assert_eq!(config.games.ai_delay("checkers"), Duration::from_millis(500));
    assert_eq!(config.games.ai_delay("dominoes"), Duration::from_millis(1000));
    assert_eq!(config.games.ai_delay("snake"), Duration::ZERO);
}

#[test]
fn test_db_path_relative_and_absolute() {
    let mut config = CentralConfig::default();
    assert_eq!(config.db_path(), PathBuf::from("./data/game-logs.db"));

    config.storage.db_file = "/tmp/elsewhere.db".to_string();
    assert_eq!(config.db_path(), PathBuf::from("/tmp/elsewhere.db"));
}

#[test]
fn test_env_overrides() {
    std::env::set_var("ARCADE_GAMES_DEFAULT_GAME", "tetris");
    std::env::set_var("ARCADE_GAMES_DOMINOES_PLAYERS", "2");
    std::env::set_var("ARCADE_WEB_ALLOWED_ORIGINS", "http://a.test, http://b.test");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.games.default_game, "tetris");
    assert_eq!(config.games.dominoes_players, 2);
    assert_eq!(
        config.web.allowed_origins,
        vec!["http://a.test".to_string(), "http://b.test".to_string()]
    );

    std::env::remove_var("ARCADE_GAMES_DEFAULT_GAME");
    std::env::remove_var("ARCADE_GAMES_DOMINOES_PLAYERS");
    std::env::remove_var("ARCADE_WEB_ALLOWED_ORIGINS");
}

#[test]
fn test_unparseable_env_override_is_ignored() {
    std::env::set_var("ARCADE_GAMES_RUNAWAY_WINDOW_MS", "two seconds");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.games.runaway_window_ms, 2000);

    std::env::remove_var("ARCADE_GAMES_RUNAWAY_WINDOW_MS");
}

#[test]
fn test_empty_user_agent_override_clears_it() {
    std::env::set_var("ARCADE_STORAGE_USER_AGENT", "");

    let config = apply_env_overrides(CentralConfig::default());
    assert!(config.storage.user_agent.is_none());

    std::env::remove_var("ARCADE_STORAGE_USER_AGENT");
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
data_dir = "/custom/data"

[storage]
db_file = "logs.sqlite"

[games]
default_game = "checkers"
checkers_ai_delay_ms = 0
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.data_dir, "/custom/data");
    assert_eq!(config.storage.db_file, "logs.sqlite");
    assert_eq!(config.games.default_game, "checkers");
    assert_eq!(config.games.checkers_ai_delay_ms, 0);
    assert_eq!(config.db_path(), PathBuf::from("/custom/data/logs.sqlite"));
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[games]
dominoes_players = 3
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.games.dominoes_players, 3);
    assert_eq!(config.games.default_game, "snake"); // Default
    assert_eq!(config.common.data_dir, "./data"); // Default
    assert_eq!(config.web.port, 8080); // Default
}

#[test]
fn test_web_config() {
    let toml_content = r#"
[web]
host = "127.0.0.1"
port = 3000
allowed_origins = ["http://localhost:5173"]
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.web.host, "127.0.0.1");
    assert_eq!(config.web.port, 3000);
    assert_eq!(config.web.allowed_origins, vec!["http://localhost:5173"]);
}

#[test]
fn test_load_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "[web]\nport = 9999").unwrap();

    let config = load_from_path(&path);
    assert_eq!(config.web.port, 9999);
}

#[test]
fn test_load_from_bad_path_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "this is [not toml").unwrap();

    let config = load_from_path(&path);
    assert_eq!(config.web.port, 8080);

    let missing = load_from_path(&dir.path().join("missing.toml"));
    assert_eq!(missing.common.log_level, "info");
}

#[test]
fn test_config_clone() {
    let config = CentralConfig::default();
    let cloned = config.clone();
    assert_eq!(config.games.default_game, cloned.games.default_game);
    assert_eq!(config.storage.db_file, cloned.storage.db_file);
}
