//! Tetris rule engine
//!
//! A 10×20 well. The falling piece drops one row per tick; when it cannot
//! drop any further it settles into the board, full rows are cleared for
//! 100 points each and a fresh piece appears at the top. The game ends when
//! a fresh piece has no room.

pub mod board;
pub mod piece;

pub use board::{Board, Row, BOARD_HEIGHT, BOARD_WIDTH};
pub use piece::{Piece, PieceKind};

use engine_core::{EventCategory, Game, GameEvent, GameMetadata, Point, RuleError, Severity};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Milliseconds between gravity ticks
pub const TICK_INTERVAL_MS: u64 = 1000;
/// Points per cleared row
pub const POINTS_PER_LINE: u32 = 100;
/// Where every new piece appears
pub const SPAWN: Point = Point::new(4, 0);

/// Complete Tetris state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub board: Board,
    pub current: Piece,
    pub score: u32,
    pub high_score: u32,
    pub lines_cleared: u32,
    pub paused: bool,
    pub game_over: bool,
}

impl State {
    fn fresh(high_score: u32, rng: &mut ChaCha20Rng) -> Self {
        Self {
            board: Board::new(),
            current: Piece::spawn(PieceKind::random(rng), SPAWN),
            score: 0,
            high_score,
            lines_cleared: 0,
            paused: false,
            game_over: false,
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            current_piece: self.current.kind,
            position: self.current.position,
            lines_cleared: self.lines_cleared,
        }
    }
}

/// Tetris input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Input {
    /// Gravity step (timer driven)
    Tick,
    MoveLeft,
    MoveRight,
    /// Player-requested gravity step
    SoftDrop,
    Rotate,
    TogglePause,
    /// Start over, keeping the high score
    Restart,
}

/// Log snapshot attached to Tetris events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub score: u32,
    pub current_piece: PieceKind,
    pub position: Point,
    pub lines_cleared: u32,
}

/// Typed `details` payloads of Tetris events
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Details {
    #[serde(rename_all = "camelCase")]
    PieceGenerated { piece_type: PieceKind, color: &'static str },
    #[serde(rename_all = "camelCase")]
    LinesCleared { lines_cleared: u32, new_score: u32 },
    #[serde(rename_all = "camelCase")]
    HighScore {
        new_high_score: u32,
        previous_high_score: u32,
    },
    #[serde(rename_all = "camelCase")]
    GameOver { final_score: u32 },
}

fn piece_generated(state: &State) -> GameEvent {
    GameEvent::info(Severity::Low, EventCategory::GameMechanics, "New piece generated")
        .with_details(&Details::PieceGenerated {
            piece_type: state.current.kind,
            color: state.current.kind.color(),
        })
        .with_snapshot(&state.snapshot())
}

/// Tetris game implementation
#[derive(Debug, Default)]
pub struct Tetris;

impl Tetris {
    pub fn new() -> Self {
        Self
    }

    /// One row of gravity; settles the piece when it cannot drop
    fn drop_one(&self, state: &mut State, rng: &mut ChaCha20Rng) -> Vec<GameEvent> {
        let lowered = state.current.shifted(0, 1);
        if state.board.fits(&lowered) {
            state.current = lowered;
            return Vec::new();
        }
        self.settle(state, rng)
    }

    fn settle(&self, state: &mut State, rng: &mut ChaCha20Rng) -> Vec<GameEvent> {
        let mut events = Vec::new();
        state.board.lock(&state.current);

        let cleared = state.board.clear_full_rows() as u32;
        if cleared > 0 {
            state.score += cleared * POINTS_PER_LINE;
            state.lines_cleared += cleared;
            debug!(cleared, score = state.score, "Rows cleared");
            events.push(
                GameEvent::info(
                    Severity::Medium,
                    EventCategory::GameMechanics,
                    format!("Cleared {} lines", cleared),
                )
                .with_details(&Details::LinesCleared {
                    lines_cleared: cleared,
                    new_score: state.score,
                })
                .with_snapshot(&state.snapshot()),
            );

            if state.score > state.high_score {
                let previous = state.high_score;
                state.high_score = state.score;
                events.push(
                    GameEvent::info(Severity::High, EventCategory::Achievement, "New high score!")
                        .with_details(&Details::HighScore {
                            new_high_score: state.score,
                            previous_high_score: previous,
                        })
                        .with_snapshot(&state.snapshot()),
                );
            }
        }

        state.current = Piece::spawn(PieceKind::random(rng), SPAWN);
        events.push(piece_generated(state));

        if !state.board.fits(&state.current) {
            state.game_over = true;
            debug!(score = state.score, "Well topped out");
            events.push(
                GameEvent::info(Severity::Medium, EventCategory::GameState, "Game Over")
                    .with_details(&Details::GameOver {
                        final_score: state.score,
                    })
                    .with_snapshot(&state.snapshot()),
            );
        }
        events
    }

    /// Replace the falling piece with `moved` if it fits
    fn try_place(state: &mut State, moved: Piece, what: &str) -> Result<Vec<GameEvent>, RuleError> {
        if state.paused {
            return Err(RuleError::Paused);
        }
        if !state.board.fits(&moved) {
            return Err(RuleError::illegal(format!("{} blocked", what)));
        }
        state.current = moved;
        Ok(Vec::new())
    }

    fn restart(&self, state: &mut State, rng: &mut ChaCha20Rng) -> Vec<GameEvent> {
        *state = State::fresh(state.high_score, rng);
        vec![
            GameEvent::info(Severity::Low, EventCategory::GameState, "Game Reset")
                .with_snapshot(&state.snapshot()),
            piece_generated(state),
        ]
    }
}

impl Game for Tetris {
    type State = State;
    type Input = Input;
    type Snapshot = Snapshot;

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("tetris", "Tetris")
            .with_board(BOARD_WIDTH, BOARD_HEIGHT)
            .with_tick_interval(TICK_INTERVAL_MS)
            .with_inputs(&[
                "tick",
                "moveLeft",
                "moveRight",
                "softDrop",
                "rotate",
                "togglePause",
                "restart",
            ])
            .with_description("Stack the falling blocks and clear full rows before the well fills up.")
    }

    fn initialize(&self, rng: &mut ChaCha20Rng) -> State {
        State::fresh(0, rng)
    }

    fn apply_input(
        &self,
        state: &mut State,
        input: Input,
        rng: &mut ChaCha20Rng,
    ) -> Result<Vec<GameEvent>, RuleError> {
        if state.game_over && input != Input::Restart {
            return Err(RuleError::GameOver);
        }

        match input {
            Input::Tick => {
                if state.paused {
                    return Ok(Vec::new());
                }
                Ok(self.drop_one(state, rng))
            }
            Input::SoftDrop => {
                if state.paused {
                    return Err(RuleError::Paused);
                }
                Ok(self.drop_one(state, rng))
            }
            Input::MoveLeft => {
                let moved = state.current.shifted(-1, 0);
                Self::try_place(state, moved, "move left")
            }
            Input::MoveRight => {
                let moved = state.current.shifted(1, 0);
                Self::try_place(state, moved, "move right")
            }
            Input::Rotate => {
                let moved = state.current.rotated();
                Self::try_place(state, moved, "rotation")
            }
            Input::TogglePause => {
                state.paused = !state.paused;
                let message = if state.paused {
                    "Game paused"
                } else {
                    "Game resumed"
                };
                Ok(vec![GameEvent::info(
                    Severity::Low,
                    EventCategory::GameState,
                    message,
                )
                .with_snapshot(&state.snapshot())])
            }
            Input::Restart => Ok(self.restart(state, rng)),
        }
    }

    fn is_terminal(&self, state: &State) -> bool {
        state.game_over
    }

    fn snapshot(&self, state: &State) -> Snapshot {
        state.snapshot()
    }
}
