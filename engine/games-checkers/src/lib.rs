//! Checkers rule engine
//!
//! The human player (bottom, moving up) plays against a computer opponent
//! (top, moving down). Inputs come either from the player (`Select`,
//! `Move`) or, on the computer's turn, from [`ai::select_move`] through
//! `ComputerTurn`.

pub mod ai;
pub mod rules;

pub use rules::{Board, Checker, Move, Side, Square, BOARD_SIZE};

use engine_core::{EventCategory, Game, GameEvent, GameMetadata, RuleError, Severity};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Complete Checkers state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub board: Board,
    pub turn: Side,
    /// Piece the player has picked up, if any
    pub selected: Option<Square>,
    pub winner: Option<Side>,
    pub game_over: bool,
}

impl State {
    fn fresh() -> Self {
        Self {
            board: Board::new(),
            turn: Side::Player,
            selected: None,
            winner: None,
            game_over: false,
        }
    }

    fn snapshot_at(&self, position: Option<Square>) -> Snapshot {
        Snapshot {
            turn: self.turn,
            player_pieces: self.board.count(Side::Player),
            computer_pieces: self.board.count(Side::Computer),
            position,
        }
    }
}

/// Checkers input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Input {
    /// Click on a square: pick up an own piece, or drop the selected piece there
    Select { square: Square },
    /// Move a player piece directly
    Move { from: Square, to: Square },
    /// Let the computer play its move
    ComputerTurn,
    Restart,
}

/// Log snapshot attached to Checkers events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub turn: Side,
    pub player_pieces: usize,
    pub computer_pieces: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Square>,
}

/// Typed `details` payloads of Checkers events
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Details {
    Capture {
        from: Square,
        to: Square,
        captured: Square,
    },
    Promotion {
        position: Square,
    },
    ComputerMove {
        #[serde(flatten)]
        mv: Move,
    },
    #[serde(rename_all = "camelCase")]
    GameOver {
        winner: Side,
        player_pieces: usize,
        computer_pieces: usize,
        /// True when the loser still had pieces but no legal move
        stalemate: bool,
    },
}

/// Checkers game implementation
#[derive(Debug, Default)]
pub struct Checkers;

impl Checkers {
    pub fn new() -> Self {
        Self
    }

    /// Apply a validated move for the side to play and hand the turn over
    fn play(&self, state: &mut State, mv: Move) -> Vec<GameEvent> {
        let mover = state.turn;
        let mut events = Vec::new();

        let crowned = state.board.perform(&mv);
        state.selected = None;

        if let Some(captured) = mv.captured {
            events.push(
                GameEvent::info(
                    Severity::Medium,
                    EventCategory::GameMechanics,
                    format!("{} captured a piece", mover.label()),
                )
                .with_details(&Details::Capture {
                    from: mv.from,
                    to: mv.to,
                    captured,
                })
                .with_snapshot(&state.snapshot_at(Some(mv.to))),
            );
        }
        if crowned {
            events.push(
                GameEvent::info(
                    Severity::Medium,
                    EventCategory::Achievement,
                    format!("{} piece promoted to king", mover.label()),
                )
                .with_details(&Details::Promotion { position: mv.to })
                .with_snapshot(&state.snapshot_at(Some(mv.to))),
            );
        }

        state.turn = mover.opponent();
        if mover == Side::Computer {
            events.push(
                GameEvent::info(Severity::Low, EventCategory::GameMechanics, "Computer made a move")
                    .with_details(&Details::ComputerMove { mv })
                    .with_snapshot(&state.snapshot_at(Some(mv.to))),
            );
        }

        if let Some(event) = self.check_game_over(state) {
            events.push(event);
        }
        events
    }

    /// End the game when a side has no pieces, or no legal move on its turn
    fn check_game_over(&self, state: &mut State) -> Option<GameEvent> {
        let player_pieces = state.board.count(Side::Player);
        let computer_pieces = state.board.count(Side::Computer);

        let (winner, stalemate) = if player_pieces == 0 || computer_pieces == 0 {
            let winner = if player_pieces > 0 {
                Side::Player
            } else {
                Side::Computer
            };
            (winner, false)
        } else if state.board.moves_for(state.turn).is_empty() {
            (state.turn.opponent(), true)
        } else {
            return None;
        };

        state.game_over = true;
        state.winner = Some(winner);
        debug!(%winner, stalemate, "Checkers game finished");
        Some(
            GameEvent::info(
                Severity::High,
                EventCategory::GameState,
                format!("Game Over - {} wins!", winner),
            )
            .with_details(&Details::GameOver {
                winner,
                player_pieces,
                computer_pieces,
                stalemate,
            })
            .with_snapshot(&state.snapshot_at(None)),
        )
    }

    /// Validate a player move against the generated moves of its piece
    fn player_move(&self, state: &State, from: Square, to: Square) -> Result<Move, RuleError> {
        from.check()?;
        to.check()?;
        match state.board.get(from) {
            Some(piece) if piece.owner == Side::Player => {}
            _ => {
                return Err(RuleError::illegal(format!(
                    "no player piece at ({}, {})",
                    from.row, from.col
                )))
            }
        }
        state
            .board
            .moves_from(from)
            .into_iter()
            .find(|mv| mv.to == to)
            .ok_or_else(|| {
                RuleError::illegal(format!(
                    "({}, {}) cannot move to ({}, {})",
                    from.row, from.col, to.row, to.col
                ))
            })
    }

    fn select(&self, state: &mut State, square: Square) -> Result<Vec<GameEvent>, RuleError> {
        square.check()?;
        if state
            .board
            .get(square)
            .is_some_and(|piece| piece.owner == Side::Player)
        {
            state.selected = Some(square);
            return Ok(Vec::new());
        }

        match state.selected {
            Some(from) => match self.player_move(state, from, square) {
                Ok(mv) => Ok(self.play(state, mv)),
                Err(_) => {
                    // Clicking anywhere else drops the selection
                    state.selected = None;
                    Ok(Vec::new())
                }
            },
            None => Err(RuleError::illegal(format!(
                "no player piece at ({}, {})",
                square.row, square.col
            ))),
        }
    }
}

impl Game for Checkers {
    type State = State;
    type Input = Input;
    type Snapshot = Snapshot;

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("checkers", "Checkers")
            .with_board(BOARD_SIZE, BOARD_SIZE)
            .with_players(vec!["player".into(), "computer".into()])
            .with_inputs(&["select", "move", "computerTurn", "restart"])
            .with_bot_inputs(&["computerTurn"])
            .with_description("Classic checkers against the computer. Capture every piece to win.")
    }

    fn initialize(&self, _rng: &mut ChaCha20Rng) -> State {
        State::fresh()
    }

    fn apply_input(
        &self,
        state: &mut State,
        input: Input,
        rng: &mut ChaCha20Rng,
    ) -> Result<Vec<GameEvent>, RuleError> {
        match input {
            Input::Restart => {
                *state = State::fresh();
                Ok(vec![GameEvent::info(
                    Severity::Low,
                    EventCategory::GameState,
                    "Game Reset",
                )
                .with_snapshot(&state.snapshot_at(None))])
            }
            _ if state.game_over => Err(RuleError::GameOver),
            Input::Select { square } => {
                if state.turn != Side::Player {
                    return Err(RuleError::NotYourTurn(Side::Player.to_string()));
                }
                self.select(state, square)
            }
            Input::Move { from, to } => {
                if state.turn != Side::Player {
                    return Err(RuleError::NotYourTurn(Side::Player.to_string()));
                }
                let mv = self.player_move(state, from, to)?;
                Ok(self.play(state, mv))
            }
            Input::ComputerTurn => {
                if state.turn != Side::Computer {
                    return Err(RuleError::NotYourTurn(Side::Computer.to_string()));
                }
                let mv = ai::select_move(&state.board, rng)
                    .ok_or_else(|| RuleError::illegal("computer has no legal move"))?;
                Ok(self.play(state, mv))
            }
        }
    }

    fn is_terminal(&self, state: &State) -> bool {
        state.game_over
    }

    fn bot_input(&self, state: &State, _rng: &mut ChaCha20Rng) -> Option<Input> {
        (!state.game_over && state.turn == Side::Computer).then_some(Input::ComputerTurn)
    }

    fn snapshot(&self, state: &State) -> Snapshot {
        state.snapshot_at(state.selected)
    }
}
