// ============================================================================
// Integration Tests
// ============================================================================

use super::*;
use crate::types::{
    ErrorResponse, GameInfoResponse, GameStateResponse, GamesListResponse, HealthResponse,
    InputResponse, SuccessResponse,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use engine_core::{EventCategory, Game, GameAdapter, GameEvent, GameMetadata, RuleError, Severity};
use http_body_util::BodyExt;
use logbook::{LogEntry, LogStats};
use rand_chacha::ChaCha20Rng;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Application state with an in-memory log store and no AI pauses
fn create_test_state() -> Arc<AppState> {
    let mut config = CentralConfig::default();
    config.games.checkers_ai_delay_ms = 0;
    config.games.dominoes_ai_delay_ms = 0;
    config.games.runaway_max_actions = 1000;
    let store: Arc<dyn LogStore> = Arc::new(SqliteLogStore::open_in_memory().unwrap());
    Arc::new(AppState::new(&config, store).unwrap())
}

fn app(state: &Arc<AppState>) -> Router {
    create_app(Arc::clone(state), &[])
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Helper to make a GET request and return response body as string
async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

/// Helper to make a POST request with JSON body and return response
async fn post_json(app: Router, uri: &str, json: &str) -> (StatusCode, String) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
    )
    .await
}

async fn delete(app: Router, uri: &str) -> (StatusCode, String) {
    send(
        app,
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

async fn stored_logs(state: &Arc<AppState>) -> Vec<LogEntry> {
    let (status, body) = get(app(state), "/logs").await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).unwrap()
}

fn log_body(id: &str, log_type: &str, category: &str, message: &str) -> String {
    json!({
        "id": id,
        "timestamp": "2024-03-01T12:00:00.000Z",
        "type": log_type,
        "message": message,
        "severity": "medium",
        "category": category,
        "details": {"source": "test"},
        "userAgent": "Mozilla/5.0"
    })
    .to_string()
}

// ========== Health ==========

#[tokio::test]
async fn test_health_endpoint() {
    let state = create_test_state();

    let (status, body) = get(app(&state), "/health").await;

    assert_eq!(status, StatusCode::OK);
    let response: HealthResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.status, "ok");
    assert_eq!(response.games, 4);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    metrics::init_metrics();
    let state = create_test_state();

    let (status, body) = get(app(&state), "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("web_games_created_total"));
}

// ========== Games ==========

#[tokio::test]
async fn test_list_games() {
    let state = create_test_state();

    let (status, body) = get(app(&state), "/games").await;

    assert_eq!(status, StatusCode::OK);
    let response: GamesListResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.games, vec!["checkers", "dominoes", "snake", "tetris"]);
}

#[tokio::test]
async fn test_get_game_info_tetris() {
    let state = create_test_state();

    let (status, body) = get(app(&state), "/game-info/tetris").await;

    assert_eq!(status, StatusCode::OK);
    let response: GameInfoResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.env_id, "tetris");
    assert_eq!(response.board_width, 10);
    assert_eq!(response.board_height, 20);
    assert_eq!(response.tick_interval_ms, Some(1000));
}

#[tokio::test]
async fn test_get_game_info_not_found() {
    let state = create_test_state();

    let (status, body) = get(app(&state), "/game-info/nonexistent").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let response: ErrorResponse = serde_json::from_str(&body).unwrap();
    assert!(response.error.contains("Game not found"));
}

#[tokio::test]
async fn test_game_state_starts_with_default_game() {
    let state = create_test_state();

    let (status, body) = get(app(&state), "/game/state").await;

    assert_eq!(status, StatusCode::OK);
    let response: GameStateResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.game, "snake");
    assert!(!response.game_over);
    assert_eq!(response.snapshot["score"], 0);
}

#[tokio::test]
async fn test_new_game_switches_game() {
    let state = create_test_state();

    let (status, body) = post_json(app(&state), "/game/new", r#"{"game": "checkers", "seed": 7}"#).await;

    assert_eq!(status, StatusCode::OK);
    let response: GameStateResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.game, "checkers");
    assert_eq!(response.seed, 7);
    assert_eq!(response.state["turn"], "player");
    assert_eq!(response.snapshot["playerPieces"], 12);
}

#[tokio::test]
async fn test_new_game_without_body_fields_uses_default() {
    let state = create_test_state();
    post_json(app(&state), "/game/new", r#"{"game": "tetris"}"#).await;

    let (status, body) = post_json(app(&state), "/game/new", r#"{}"#).await;

    assert_eq!(status, StatusCode::OK);
    let response: GameStateResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.game, "snake");
}

#[tokio::test]
async fn test_new_game_unknown_keeps_session() {
    let state = create_test_state();
    post_json(app(&state), "/game/new", r#"{"game": "tetris"}"#).await;

    let (status, body) = post_json(app(&state), "/game/new", r#"{"game": "pong"}"#).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Game not found: pong"));
    let (_, body) = get(app(&state), "/game/state").await;
    let response: GameStateResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.game, "tetris");
}

#[tokio::test]
async fn test_snake_tick() {
    let state = create_test_state();

    let (status, body) =
        post_json(app(&state), "/game/input", r#"{"input": {"kind": "tick"}}"#).await;

    assert_eq!(status, StatusCode::OK);
    let response: InputResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.state.game, "snake");
    assert_eq!(response.bot_moves, 0);
}

#[tokio::test]
async fn test_checkers_move_gets_computer_reply() {
    let state = create_test_state();
    post_json(app(&state), "/game/new", r#"{"game": "checkers", "seed": 11}"#).await;

    let input = json!({
        "input": {"kind": "move", "from": {"row": 5, "col": 2}, "to": {"row": 4, "col": 3}}
    });
    let (status, body) = post_json(app(&state), "/game/input", &input.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let response: InputResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.bot_moves, 1);
    assert_eq!(response.state.state["turn"], "player");
    assert!(response
        .events
        .iter()
        .any(|e| e.message == "Computer made a move"));

    let logs = stored_logs(&state).await;
    let computer = logs
        .iter()
        .find(|l| l.message == "Computer made a move")
        .unwrap();
    assert_eq!(computer.category, "game-mechanics");
    assert_eq!(computer.user_agent.as_deref(), Some("arcade-server"));
}

#[tokio::test]
async fn test_illegal_input_is_bad_request() {
    let state = create_test_state();
    post_json(app(&state), "/game/new", r#"{"game": "checkers"}"#).await;
    let (_, before) = get(app(&state), "/game/state").await;

    let input = json!({
        "input": {"kind": "move", "from": {"row": 5, "col": 2}, "to": {"row": 6, "col": 3}}
    });
    let (status, body) = post_json(app(&state), "/game/input", &input.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response: ErrorResponse = serde_json::from_str(&body).unwrap();
    assert!(response.error.contains("Illegal move"));
    let (_, after) = get(app(&state), "/game/state").await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_malformed_input_is_bad_request() {
    let state = create_test_state();

    let (status, _) =
        post_json(app(&state), "/game/input", r#"{"input": {"kind": "fly"}}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(app(&state), "/game/input", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dominoes_round_returns_to_human() {
    let state = create_test_state();
    let (_, body) = post_json(app(&state), "/game/new", r#"{"game": "dominoes"}"#).await;
    let start: GameStateResponse = serde_json::from_str(&body).unwrap();
    let tile = start.state["players"][0]["hand"][0].clone();

    let input = json!({"input": {"kind": "play", "tile": tile, "end": "right"}});
    let (status, body) = post_json(app(&state), "/game/input", &input.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let response: InputResponse = serde_json::from_str(&body).unwrap();
    assert!(response.bot_moves >= 3);
    assert_eq!(response.state.state["currentPlayerIndex"], 0);
    assert!(response
        .events
        .iter()
        .any(|e| e.message.starts_with("AI 1 ")));
}

#[tokio::test]
async fn test_client_cannot_drive_halted_computer_seats() {
    let mut config = CentralConfig::default();
    config.games.dominoes_ai_delay_ms = 0;
    config.games.runaway_max_actions = 1;
    let store: Arc<dyn LogStore> = Arc::new(SqliteLogStore::open_in_memory().unwrap());
    let state = Arc::new(AppState::new(&config, store).unwrap());

    let (_, body) = post_json(app(&state), "/game/new", r#"{"game": "dominoes"}"#).await;
    let start: GameStateResponse = serde_json::from_str(&body).unwrap();
    let tile = start.state["players"][0]["hand"][0].clone();
    let input = json!({"input": {"kind": "play", "tile": tile, "end": "right"}});
    let (_, body) = post_json(app(&state), "/game/input", &input.to_string()).await;
    let played: InputResponse = serde_json::from_str(&body).unwrap();
    assert!(played.state.automation_halted);
    assert_ne!(played.state.state["currentPlayerIndex"], 0);

    let (status, _) = post_json(app(&state), "/game/input", r#"{"input": {"kind": "aiTurn"}}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, body) = get(app(&state), "/game/state").await;
    let after: GameStateResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(after.state, played.state.state);
    assert!(after.automation_halted);
}

/// Counts up on player input; the computer's reply is always rejected
#[derive(Debug)]
struct BrokenBot;

impl Game for BrokenBot {
    type State = u32;
    type Input = u32;
    type Snapshot = u32;

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("broken", "Broken")
            .with_players(vec!["Player".to_string(), "Computer".to_string()])
    }

    fn initialize(&self, _rng: &mut ChaCha20Rng) -> u32 {
        0
    }

    fn apply_input(
        &self,
        state: &mut u32,
        input: u32,
        _rng: &mut ChaCha20Rng,
    ) -> Result<Vec<GameEvent>, RuleError> {
        if input != 1 {
            return Err(RuleError::illegal("only single steps"));
        }
        *state += 1;
        Ok(vec![GameEvent::info(Severity::Low, EventCategory::Input, "stepped")])
    }

    fn is_terminal(&self, _state: &u32) -> bool {
        false
    }

    fn bot_input(&self, state: &u32, _rng: &mut ChaCha20Rng) -> Option<u32> {
        (*state % 2 == 1).then_some(7)
    }

    fn snapshot(&self, state: &u32) -> u32 {
        *state
    }
}

#[tokio::test]
async fn test_failed_computer_move_keeps_player_move() {
    let mut registry = Registry::new();
    registry.register("broken", || Box::new(GameAdapter::new(BrokenBot)));
    let games = GamesConfig {
        checkers_ai_delay_ms: 0,
        dominoes_ai_delay_ms: 0,
        ..GamesConfig::default()
    };
    let store: Arc<dyn LogStore> = Arc::new(SqliteLogStore::open_in_memory().unwrap());
    let session = GameSession::new(&registry, "broken", Some(1), &games).unwrap();
    let state = Arc::new(AppState {
        registry,
        session: Mutex::new(session),
        emitter: LogEmitter::new(Arc::clone(&store)),
        store,
        games,
    });

    let (status, body) = post_json(app(&state), "/game/input", r#"{"input": 1}"#).await;

    assert_eq!(status, StatusCode::OK);
    let response: InputResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.state.state, json!(1));
    assert_eq!(response.bot_moves, 0);
    assert_eq!(response.events.len(), 1);
    assert!(response.bot_error.unwrap().contains("only single steps"));
    assert_eq!(stored_logs(&state).await.len(), 1);
}

// ========== Logs ==========

#[tokio::test]
async fn test_create_and_list_log() {
    let state = create_test_state();

    let (status, body) = post_json(
        app(&state),
        "/logs",
        &log_body("log-1", "error", "collision", "Wall collision"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: SuccessResponse = serde_json::from_str(&body).unwrap();
    assert!(response.success);
    assert_eq!(response.id.as_deref(), Some("log-1"));

    let logs = stored_logs(&state).await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].message, "Wall collision");
    assert_eq!(logs[0].details, Some(json!({"source": "test"})));
    assert_eq!(logs[0].user_agent.as_deref(), Some("Mozilla/5.0"));
    assert_eq!(logs[0].game_state, None);
}

#[tokio::test]
async fn test_create_log_missing_severity_is_rejected() {
    let state = create_test_state();
    post_json(app(&state), "/logs", &log_body("keep", "info", "input", "kept")).await;

    let mut body: Value = serde_json::from_str(&log_body("x", "error", "network", "m")).unwrap();
    body.as_object_mut().unwrap().remove("severity");
    let (status, response) = post_json(app(&state), "/logs", &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response: ErrorResponse = serde_json::from_str(&response).unwrap();
    assert_eq!(response.error, "Missing required fields");
    let logs = stored_logs(&state).await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].id, "keep");
}

#[tokio::test]
async fn test_create_log_invalid_values_rejected() {
    let state = create_test_state();

    let (status, _) = post_json(app(&state), "/logs", &log_body("a", "fatal", "c", "m")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(app(&state), "/logs", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(stored_logs(&state).await.is_empty());
}

#[tokio::test]
async fn test_create_log_far_future_timestamp_rejected() {
    let state = create_test_state();
    post_json(app(&state), "/logs", &log_body("keep", "error", "network", "kept")).await;

    let mut body: Value = serde_json::from_str(&log_body("far", "error", "network", "m")).unwrap();
    body["timestamp"] = json!(300_000_000_000_000i64);
    let (status, response) = post_json(app(&state), "/logs", &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response: ErrorResponse = serde_json::from_str(&response).unwrap();
    assert_eq!(response.error, "Invalid timestamp");
    assert_eq!(stored_logs(&state).await.len(), 1);
    let (status, _) = get(app(&state), "/logs/categories").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_log_storage_failure() {
    let state = create_test_state();
    state.store.close().await.unwrap();

    let (status, body) =
        post_json(app(&state), "/logs", &log_body("a", "info", "input", "m")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let response: ErrorResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.error, "Error creating log");
    assert!(response.details.is_some());
}

#[tokio::test]
async fn test_clear_logs() {
    let state = create_test_state();
    for i in 0..3 {
        post_json(
            app(&state),
            "/logs",
            &log_body(&format!("log-{}", i), "info", "input", "m"),
        )
        .await;
    }

    let (status, body) = delete(app(&state), "/logs").await;

    assert_eq!(status, StatusCode::OK);
    let response: SuccessResponse = serde_json::from_str(&body).unwrap();
    assert!(response.success);
    assert!(stored_logs(&state).await.is_empty());
}

#[tokio::test]
async fn test_list_logs_filters() {
    let state = create_test_state();
    post_json(app(&state), "/logs", &log_body("a", "error", "collision", "Wall collision")).await;
    post_json(app(&state), "/logs", &log_body("b", "error", "network", "Timeout")).await;
    post_json(app(&state), "/logs", &log_body("c", "info", "collision", "Near wall")).await;

    let (status, body) = get(app(&state), "/logs?type=error&search=WALL").await;
    assert_eq!(status, StatusCode::OK);
    let logs: Vec<LogEntry> = serde_json::from_str(&body).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].id, "a");

    let (_, body) = get(app(&state), "/logs?type=all&severity=medium").await;
    let logs: Vec<LogEntry> = serde_json::from_str(&body).unwrap();
    assert_eq!(logs.len(), 3);

    let (status, _) = get(app(&state), "/logs?severity=urgent").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_log_dashboard_endpoints() {
    let state = create_test_state();
    for (id, category) in [("d1", "database"), ("d2", "database"), ("n1", "network")] {
        post_json(app(&state), "/logs", &log_body(id, "error", category, "failed")).await;
    }
    post_json(app(&state), "/logs", &log_body("i1", "info", "input", "ok")).await;

    let (status, body) = get(app(&state), "/logs/stats").await;
    assert_eq!(status, StatusCode::OK);
    let stats: LogStats = serde_json::from_str(&body).unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.by_type.error, 3);
    assert_eq!(stats.by_severity.medium, 4);

    let (status, body) = get(app(&state), "/logs/categories").await;
    assert_eq!(status, StatusCode::OK);
    let categories: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        categories,
        json!([
            {"category": "database", "count": 2},
            {"category": "network", "count": 1}
        ])
    );

    let (status, body) = get(app(&state), "/logs/timeline?utcOffsetMinutes=0").await;
    assert_eq!(status, StatusCode::OK);
    let timeline: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(timeline.len(), 145);
    assert_eq!(timeline[144]["label"], "12:00 PM");
    assert_eq!(timeline[144]["error"], 3);
    assert_eq!(timeline[144]["info"], 1);
}

#[tokio::test]
async fn test_timeline_rejects_out_of_range_offset() {
    let state = create_test_state();
    post_json(app(&state), "/logs", &log_body("a", "info", "input", "m")).await;

    for offset in ["2147483647", "-2147483648", "1440"] {
        let (status, body) =
            get(app(&state), &format!("/logs/timeline?utcOffsetMinutes={}", offset)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", offset);
        let response: ErrorResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(response.error, "Invalid utcOffsetMinutes");
    }

    let (status, _) = get(app(&state), "/logs/timeline?utcOffsetMinutes=-600").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_timeline_empty_without_logs() {
    let state = create_test_state();

    let (status, body) = get(app(&state), "/logs/timeline").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}
