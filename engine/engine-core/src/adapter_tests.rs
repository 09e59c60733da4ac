//! Tests for the GameAdapter type

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::adapter::GameAdapter;
use crate::erased::{EngineError, ErasedGame};
use crate::event::{EventCategory, GameEvent, Severity};
use crate::metadata::GameMetadata;
use crate::typed::{Game, RuleError};

// Counter that only accepts steps of 1..=3 and stops at 20
#[derive(Debug)]
struct StepGame;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StepState {
    total: u32,
    moves: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum StepInput {
    Add { amount: u32 },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StepSnapshot {
    total: u32,
    moves_made: u32,
}

impl Game for StepGame {
    type State = StepState;
    type Input = StepInput;
    type Snapshot = StepSnapshot;

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("step", "Step Game").with_board(1, 1)
    }

    fn initialize(&self, rng: &mut ChaCha20Rng) -> StepState {
        StepState {
            total: rng.gen_range(0..5),
            moves: 0,
        }
    }

    fn apply_input(
        &self,
        state: &mut StepState,
        input: StepInput,
        _rng: &mut ChaCha20Rng,
    ) -> Result<Vec<GameEvent>, RuleError> {
        if self.is_terminal(state) {
            return Err(RuleError::GameOver);
        }
        let StepInput::Add { amount } = input;
        if !(1..=3).contains(&amount) {
            return Err(RuleError::illegal(format!("cannot add {}", amount)));
        }
        state.total += amount;
        state.moves += 1;
        Ok(vec![GameEvent::info(
            Severity::Low,
            EventCategory::GameMechanics,
            format!("Added {}", amount),
        )])
    }

    fn is_terminal(&self, state: &StepState) -> bool {
        state.total >= 20
    }

    fn bot_input(&self, state: &StepState, _rng: &mut ChaCha20Rng) -> Option<StepInput> {
        (!self.is_terminal(state)).then_some(StepInput::Add { amount: 3 })
    }

    fn snapshot(&self, state: &StepState) -> StepSnapshot {
        StepSnapshot {
            total: state.total,
            moves_made: state.moves,
        }
    }
}

fn rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

#[test]
fn test_adapter_metadata_passthrough() {
    let adapter = GameAdapter::new(StepGame);
    assert_eq!(adapter.metadata().env_id, "step");
    assert_eq!(adapter.metadata().display_name, "Step Game");
}

#[test]
fn test_adapter_initialize_is_seeded() {
    let adapter = GameAdapter::new(StepGame);

    let a = adapter.initialize(&mut rng(7)).unwrap();
    let b = adapter.initialize(&mut rng(7)).unwrap();

    assert_eq!(a, b);
    assert_eq!(a["moves"], 0);
}

#[test]
fn test_adapter_apply_updates_encoded_state() {
    let adapter = GameAdapter::new(StepGame);
    let mut state = json!({"total": 0, "moves": 0});

    let events = adapter
        .apply_input(&mut state, &json!({"kind": "add", "amount": 2}), &mut rng(1))
        .unwrap();

    assert_eq!(state, json!({"total": 2, "moves": 1}));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].message, "Added 2");
}

#[test]
fn test_adapter_rule_error_keeps_state() {
    let adapter = GameAdapter::new(StepGame);
    let mut state = json!({"total": 4, "moves": 1});

    let err = adapter
        .apply_input(&mut state, &json!({"kind": "add", "amount": 9}), &mut rng(1))
        .unwrap_err();

    assert!(matches!(err, EngineError::Rule(RuleError::IllegalMove(_))));
    assert_eq!(state, json!({"total": 4, "moves": 1}));
}

#[test]
fn test_adapter_rejects_malformed_input() {
    let adapter = GameAdapter::new(StepGame);
    let mut state = json!({"total": 4, "moves": 1});

    let err = adapter
        .apply_input(&mut state, &json!({"kind": "jump"}), &mut rng(1))
        .unwrap_err();

    match err {
        EngineError::Decode { what, .. } => assert_eq!(what, "input"),
        other => panic!("Expected input decode error, got {:?}", other),
    }
    assert_eq!(state["total"], 4);
}

#[test]
fn test_adapter_rejects_malformed_state() {
    let adapter = GameAdapter::new(StepGame);

    let err = adapter.is_terminal(&json!({"total": "many"})).unwrap_err();

    assert!(matches!(err, EngineError::Decode { what: "state", .. }));
}

#[test]
fn test_adapter_bot_input_and_terminal() {
    let adapter = GameAdapter::new(StepGame);
    let mut state = json!({"total": 15, "moves": 5});

    let input = adapter.bot_input(&state, &mut rng(1)).unwrap().unwrap();
    assert_eq!(input, json!({"kind": "add", "amount": 3}));

    adapter.apply_input(&mut state, &input, &mut rng(1)).unwrap();
    adapter.apply_input(&mut state, &input, &mut rng(1)).unwrap();

    assert!(adapter.is_terminal(&state).unwrap());
    assert_eq!(adapter.bot_input(&state, &mut rng(1)).unwrap(), None);

    let err = adapter
        .apply_input(&mut state, &input, &mut rng(1))
        .unwrap_err();
    assert!(matches!(err, EngineError::Rule(RuleError::GameOver)));
}

#[test]
fn test_adapter_snapshot_is_camel_case() {
    let adapter = GameAdapter::new(StepGame);

    let snapshot = adapter
        .snapshot(&json!({"total": 6, "moves": 2}))
        .unwrap();

    assert_eq!(snapshot, json!({"total": 6, "movesMade": 2}));
}

#[test]
fn test_adapter_into_inner() {
    let adapter = GameAdapter::new(StepGame);
    let game = adapter.into_inner();
    assert_eq!(game.metadata().env_id, "step");
}
