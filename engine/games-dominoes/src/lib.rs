//! Dominoes rule engine
//!
//! Block dominoes for two to four seats with a double-six set. Seat 0 is the
//! human; the remaining seats are computer players driven by
//! [`ai::choose_action`] through the `AiTurn` input.
//!
//! The deal is deterministic: the set is shuffled with a fixed seed
//! ([`DEFAULT_SHUFFLE_SEED`]) so that every game starts from the same hands
//! unless a different seed is configured.

pub mod ai;
pub mod tile;

pub use ai::Action;
pub use tile::{all_tiles, shuffle, shuffled_set, Tile, DEFAULT_SHUFFLE_SEED, SET_SIZE};

use engine_core::{EventCategory, Game, GameEvent, GameMetadata, RuleError, Severity};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Tiles dealt to each seat
pub const HAND_SIZE: usize = 7;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;
pub const DEFAULT_PLAYERS: usize = 4;

/// Side of the chain a tile is laid on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum End {
    Left,
    Right,
}

/// The chain of laid tiles, oriented so neighbouring values touch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    tiles: Vec<Tile>,
}

impl Table {
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Open values at the left and right ends, `None` before the first tile
    pub fn endpoints(&self) -> Option<(u8, u8)> {
        let first = self.tiles.first()?;
        let last = self.tiles.last()?;
        Some((first.left, last.right))
    }

    pub fn fits(&self, tile: Tile, end: End) -> bool {
        match (self.endpoints(), end) {
            (None, _) => true,
            (Some((left, _)), End::Left) => tile.has(left),
            (Some((_, right)), End::Right) => tile.has(right),
        }
    }

    /// Whether `tile` fits on either end
    pub fn accepts(&self, tile: Tile) -> bool {
        self.fits(tile, End::Left) || self.fits(tile, End::Right)
    }

    /// Lay `tile` on `end`, turning it so the matching value faces the chain
    ///
    /// Returns `false` and leaves the table alone when the tile does not fit.
    pub fn place(&mut self, tile: Tile, end: End) -> bool {
        match (self.endpoints(), end) {
            (None, _) => self.tiles.push(tile),
            (Some((left, _)), End::Left) if tile.has(left) => {
                let oriented = if tile.right == left { tile } else { tile.flipped() };
                self.tiles.insert(0, oriented);
            }
            (Some((_, right)), End::Right) if tile.has(right) => {
                let oriented = if tile.left == right { tile } else { tile.flipped() };
                self.tiles.push(oriented);
            }
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    Human,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlayerKind,
    pub hand: Vec<Tile>,
    pub score: u32,
}

impl Player {
    pub fn pips(&self) -> u32 {
        self.hand.iter().map(Tile::pips).sum()
    }

    pub fn can_play(&self, table: &Table) -> bool {
        self.hand.iter().any(|&tile| table.accepts(tile))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    pub player: usize,
    pub action: Action,
}

/// Complete Dominoes state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub players: Vec<Player>,
    pub table: Table,
    pub boneyard: Vec<Tile>,
    pub current_player_index: usize,
    pub status: Status,
    /// Seat index of the winner
    pub winner: Option<usize>,
    pub last_move: Option<LastMove>,
}

impl State {
    pub fn current(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    /// Every tile in the game, hands then table then boneyard, normalized and sorted
    ///
    /// Always equals [`all_tiles`]; tiles only ever move between the three places.
    pub fn census(&self) -> Vec<Tile> {
        let mut tiles: Vec<Tile> = self
            .players
            .iter()
            .flat_map(|p| p.hand.iter())
            .chain(self.table.tiles())
            .chain(&self.boneyard)
            .map(Tile::normalized)
            .collect();
        tiles.sort();
        tiles
    }

    fn advance(&mut self) {
        self.current_player_index = (self.current_player_index + 1) % self.players.len();
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            board_size: self.table.len(),
            remaining_tiles: self.boneyard.len(),
            current_player: self.current().name.clone(),
            endpoints: self.table.endpoints().map(|(l, r)| [l, r]),
        }
    }
}

/// Dominoes input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Input {
    /// Lay a tile from the human's hand
    Play { tile: Tile, end: End },
    /// Take one tile from the boneyard; the turn stays
    Draw,
    Pass,
    /// Let the computer seat on turn act
    AiTurn,
    Restart,
}

/// Log snapshot attached to Dominoes events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub board_size: usize,
    pub remaining_tiles: usize,
    pub current_player: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<[u8; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    /// A seat played its last tile
    Domino,
    /// Nobody can play and the boneyard is empty
    Blocked,
}

/// Typed `details` payloads of Dominoes events
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Details {
    Played {
        player: String,
        #[serde(rename = "move")]
        mv: Action,
    },
    Drew {
        player: String,
    },
    Passed {
        player: String,
    },
    #[serde(rename_all = "camelCase")]
    GameOver {
        winner: String,
        reason: EndReason,
        remaining_pips: Vec<u32>,
        score: u32,
    },
}

/// Dominoes game implementation
#[derive(Debug)]
pub struct Dominoes {
    players: usize,
    shuffle_seed: u64,
}

impl Default for Dominoes {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYERS)
    }
}

impl Dominoes {
    /// A table for `players` seats, clamped to 2..=4
    pub fn new(players: usize) -> Self {
        let clamped = players.clamp(MIN_PLAYERS, MAX_PLAYERS);
        if clamped != players {
            warn!(requested = players, using = clamped, "Unsupported dominoes player count");
        }
        Self {
            players: clamped,
            shuffle_seed: DEFAULT_SHUFFLE_SEED,
        }
    }

    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = seed;
        self
    }

    pub fn players(&self) -> usize {
        self.players
    }

    fn deal(&self) -> State {
        let mut stock = shuffled_set(self.shuffle_seed);
        let players = (0..self.players)
            .map(|seat| {
                let hand: Vec<Tile> = stock.drain(..HAND_SIZE).collect();
                if seat == 0 {
                    Player {
                        id: "human".into(),
                        name: "Player".into(),
                        kind: PlayerKind::Human,
                        hand,
                        score: 0,
                    }
                } else {
                    Player {
                        id: format!("ai-{}", seat),
                        name: format!("AI {}", seat),
                        kind: PlayerKind::Ai,
                        hand,
                        score: 0,
                    }
                }
            })
            .collect();

        State {
            players,
            table: Table::default(),
            boneyard: stock,
            current_player_index: 0,
            status: Status::Waiting,
            winner: None,
            last_move: None,
        }
    }

    /// Check `action` for the seat on turn without touching the state
    fn validate(state: &State, action: Action) -> Result<(), RuleError> {
        let player = state.current();
        match action {
            Action::Play { tile, end } => {
                if !player.hand.iter().any(|t| t.same_as(&tile)) {
                    return Err(RuleError::illegal(format!(
                        "{} does not hold {}",
                        player.name, tile
                    )));
                }
                if !state.table.fits(tile, end) {
                    return Err(RuleError::illegal(format!(
                        "{} does not match the {:?} end",
                        tile, end
                    )));
                }
            }
            Action::Draw => {
                if state.boneyard.is_empty() {
                    return Err(RuleError::illegal("the boneyard is empty"));
                }
                if player.can_play(&state.table) {
                    return Err(RuleError::illegal("a playable tile must be played"));
                }
            }
            Action::Pass => {
                if player.can_play(&state.table) {
                    return Err(RuleError::illegal("a playable tile must be played"));
                }
                if !state.boneyard.is_empty() {
                    return Err(RuleError::illegal("must draw before passing"));
                }
            }
        }
        Ok(())
    }

    fn act(&self, state: &mut State, action: Action) -> Result<Vec<GameEvent>, RuleError> {
        Self::validate(state, action)?;

        let seat = state.current_player_index;
        let name = state.current().name.clone();
        let id = state.current().id.clone();
        state.status = Status::Playing;
        state.last_move = Some(LastMove {
            player: seat,
            action,
        });

        let mut events = Vec::new();
        match action {
            Action::Play { tile, end } => {
                let hand = &mut state.players[seat].hand;
                if let Some(index) = hand.iter().position(|t| t.same_as(&tile)) {
                    let held = hand.remove(index);
                    state.table.place(held, end);
                }
                events.push(
                    GameEvent::info(
                        Severity::Low,
                        EventCategory::Dominoes,
                        format!("{} played {}", name, tile),
                    )
                    .with_details(&Details::Played {
                        player: id,
                        mv: action,
                    })
                    .with_snapshot(&state.snapshot()),
                );

                if state.players[seat].hand.is_empty() {
                    events.push(self.finish(state, seat, EndReason::Domino));
                    return Ok(events);
                }
                state.advance();
            }
            Action::Draw => {
                let drawn = state.boneyard.remove(0);
                state.players[seat].hand.push(drawn);
                events.push(
                    GameEvent::info(
                        Severity::Low,
                        EventCategory::Dominoes,
                        format!("{} drew a tile", name),
                    )
                    .with_details(&Details::Drew { player: id })
                    .with_snapshot(&state.snapshot()),
                );
                return Ok(events);
            }
            Action::Pass => {
                events.push(
                    GameEvent::info(
                        Severity::Low,
                        EventCategory::Dominoes,
                        format!("{} passed", name),
                    )
                    .with_details(&Details::Passed { player: id })
                    .with_snapshot(&state.snapshot()),
                );
                state.advance();
            }
        }

        let blocked = state.boneyard.is_empty()
            && state.players.iter().all(|p| !p.can_play(&state.table));
        if blocked {
            // Lowest pip count wins; min_by_key keeps the first seat on ties
            let winner = state
                .players
                .iter()
                .enumerate()
                .min_by_key(|(_, p)| p.pips())
                .map_or(0, |(seat, _)| seat);
            events.push(self.finish(state, winner, EndReason::Blocked));
        }
        Ok(events)
    }

    fn finish(&self, state: &mut State, winner: usize, reason: EndReason) -> GameEvent {
        let remaining_pips: Vec<u32> = state.players.iter().map(Player::pips).collect();
        let won: u32 = remaining_pips
            .iter()
            .enumerate()
            .filter(|&(seat, _)| seat != winner)
            .map(|(_, pips)| pips)
            .sum();

        state.players[winner].score += won;
        state.status = Status::Finished;
        state.winner = Some(winner);
        let name = state.players[winner].name.clone();
        debug!(winner = %name, ?reason, score = won, "Dominoes round finished");

        GameEvent::info(
            Severity::High,
            EventCategory::GameState,
            format!("Game Over - {} wins!", name),
        )
        .with_details(&Details::GameOver {
            winner: name,
            reason,
            remaining_pips,
            score: won,
        })
        .with_snapshot(&state.snapshot())
    }
}

fn require_turn(state: &State, kind: PlayerKind) -> Result<(), RuleError> {
    let player = state.current();
    if player.kind == kind {
        Ok(())
    } else {
        Err(RuleError::NotYourTurn(player.name.clone()))
    }
}

impl Game for Dominoes {
    type State = State;
    type Input = Input;
    type Snapshot = Snapshot;

    fn metadata(&self) -> GameMetadata {
        let names = (0..self.players)
            .map(|seat| {
                if seat == 0 {
                    "Player".to_string()
                } else {
                    format!("AI {}", seat)
                }
            })
            .collect();
        GameMetadata::new("dominoes", "Dominoes")
            .with_players(names)
            .with_inputs(&["play", "draw", "pass", "aiTurn", "restart"])
            .with_bot_inputs(&["aiTurn"])
            .with_description("Match the open ends of the chain and be the first to empty your hand.")
    }

    fn initialize(&self, _rng: &mut ChaCha20Rng) -> State {
        self.deal()
    }

    fn apply_input(
        &self,
        state: &mut State,
        input: Input,
        _rng: &mut ChaCha20Rng,
    ) -> Result<Vec<GameEvent>, RuleError> {
        if state.status == Status::Finished && input != Input::Restart {
            return Err(RuleError::GameOver);
        }

        let action = match input {
            Input::Restart => {
                *state = self.deal();
                return Ok(vec![GameEvent::info(
                    Severity::Low,
                    EventCategory::GameState,
                    "Game Reset",
                )
                .with_snapshot(&state.snapshot())]);
            }
            Input::AiTurn => {
                require_turn(state, PlayerKind::Ai)?;
                let player = state.current();
                ai::choose_action(&player.hand, &state.table, state.boneyard.len())
            }
            Input::Play { tile, end } => {
                require_turn(state, PlayerKind::Human)?;
                Action::Play { tile, end }
            }
            Input::Draw => {
                require_turn(state, PlayerKind::Human)?;
                Action::Draw
            }
            Input::Pass => {
                require_turn(state, PlayerKind::Human)?;
                Action::Pass
            }
        };
        self.act(state, action)
    }

    fn is_terminal(&self, state: &State) -> bool {
        state.status == Status::Finished
    }

    fn bot_input(&self, state: &State, _rng: &mut ChaCha20Rng) -> Option<Input> {
        (state.status != Status::Finished && state.current().kind == PlayerKind::Ai)
            .then_some(Input::AiTurn)
    }

    fn snapshot(&self, state: &State) -> Snapshot {
        state.snapshot()
    }
}
