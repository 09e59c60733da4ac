//! Snake rule engine
//!
//! The snake moves one cell per tick in its facing direction on a 20×20 grid,
//! grows by one segment for every food it eats and dies on hitting a wall or
//! its own body. Every notable transition is reported as a `GameEvent`.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{EngineContext, GameAdapter, Registry};
//! use games_snake::Snake;
//!
//! let mut registry = Registry::new();
//! registry.register("snake", || Box::new(GameAdapter::new(Snake::new())));
//!
//! let mut ctx = EngineContext::new(&registry, "snake", 42).unwrap();
//! let result = ctx.apply(&serde_json::json!({"kind": "tick"})).unwrap();
//! assert!(!result.terminal);
//! ```

use engine_core::grid::cells;
use engine_core::{
    EventCategory, Game, GameEvent, GameMetadata, Point, RuleError, Severity,
};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Board width and height in cells
pub const GRID_SIZE: usize = 20;
/// Milliseconds between ticks
pub const TICK_INTERVAL_MS: u64 = 150;
/// Scores that trigger an achievement event
pub const SCORE_MILESTONES: [u32; 6] = [5, 10, 15, 20, 25, 30];

const START: Point = Point::new(10, 10);
const FIRST_FOOD: Point = Point::new(15, 15);

/// Facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Cell offset of one step, y grows downwards
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Complete Snake state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Occupied cells, head first
    pub snake: Vec<Point>,
    pub food: Point,
    /// Direction the next tick moves in
    pub direction: Direction,
    /// Direction of the last completed move; reversal is judged against this
    pub last_moved: Direction,
    pub score: u32,
    pub high_score: u32,
    pub paused: bool,
    pub game_over: bool,
}

impl State {
    fn fresh(high_score: u32, food: Point) -> Self {
        Self {
            snake: vec![START],
            food,
            direction: Direction::Right,
            last_moved: Direction::Right,
            score: 0,
            high_score,
            paused: false,
            game_over: false,
        }
    }

    pub fn head(&self) -> Point {
        self.snake[0]
    }

    fn snapshot_at(&self, position: Point) -> Snapshot {
        Snapshot {
            score: self.score,
            snake_length: self.snake.len(),
            position,
        }
    }

    /// Uniformly random cell not covered by the snake, `None` when the board is full
    fn random_free_cell(&self, rng: &mut ChaCha20Rng) -> Option<Point> {
        let free: Vec<Point> = cells(GRID_SIZE, GRID_SIZE)
            .filter(|cell| !self.snake.contains(cell))
            .collect();
        free.choose(rng).copied()
    }
}

/// Snake input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Input {
    /// Advance one cell (timer driven)
    Tick,
    /// Change the facing direction
    Turn { direction: Direction },
    TogglePause,
    /// Start over, keeping the high score
    Restart,
}

/// Log snapshot attached to every Snake event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub score: u32,
    pub snake_length: usize,
    pub position: Point,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Bounds {
    pub width: usize,
    pub height: usize,
}

/// Typed `details` payloads of Snake events
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Details {
    FoodGenerated {
        food: Point,
    },
    #[serde(rename_all = "camelCase")]
    FoodEaten {
        new_score: u32,
        food_position: Point,
    },
    Milestone {
        milestone: u32,
    },
    #[serde(rename_all = "camelCase")]
    HighScore {
        new_high_score: u32,
        previous_high_score: u32,
    },
    WallCollision {
        head: Point,
        bounds: Bounds,
    },
    SelfCollision {
        head: Point,
        snake: Vec<Point>,
    },
    #[serde(rename_all = "camelCase")]
    GameOver {
        final_score: u32,
    },
    #[serde(rename_all = "camelCase")]
    DirectionChanged {
        old_direction: Direction,
        new_direction: Direction,
    },
}

/// Snake game implementation
#[derive(Debug, Default)]
pub struct Snake;

impl Snake {
    pub fn new() -> Self {
        Self
    }

    fn tick(&self, state: &mut State, rng: &mut ChaCha20Rng) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if state.paused {
            return events;
        }

        let (dx, dy) = state.direction.delta();
        let head = state.head().offset(dx, dy);

        let collision = if !head.in_bounds(GRID_SIZE, GRID_SIZE) {
            Some((
                "Wall collision detected",
                Details::WallCollision {
                    head,
                    bounds: Bounds {
                        width: GRID_SIZE,
                        height: GRID_SIZE,
                    },
                },
            ))
        } else if state.snake[1..].contains(&head) {
            Some((
                "Self collision detected",
                Details::SelfCollision {
                    head,
                    snake: state.snake.clone(),
                },
            ))
        } else {
            None
        };

        if let Some((message, details)) = collision {
            let snapshot = state.snapshot_at(head);
            events.push(
                GameEvent::error(Severity::Medium, EventCategory::Collision, message)
                    .with_details(&details)
                    .with_snapshot(&snapshot),
            );
            events.push(game_over_event(state, head));
            state.game_over = true;
            debug!(score = state.score, "Snake crashed");
            return events;
        }

        let ate = head == state.food;
        let before = state.snapshot_at(state.head());
        state.snake.insert(0, head);
        if !ate {
            state.snake.pop();
        }
        state.last_moved = state.direction;

        if !ate {
            return events;
        }

        let eaten = state.food;
        state.score += 1;
        let next_food = state.random_free_cell(rng);
        if let Some(food) = next_food {
            state.food = food;
            events.push(
                GameEvent::info(Severity::Low, EventCategory::GameMechanics, "Food generated")
                    .with_details(&Details::FoodGenerated { food })
                    .with_snapshot(&before),
            );
        }

        let after = state.snapshot_at(head);
        if SCORE_MILESTONES.contains(&state.score) {
            events.push(
                GameEvent::info(
                    Severity::Medium,
                    EventCategory::Achievement,
                    format!("Milestone reached: {} points!", state.score),
                )
                .with_details(&Details::Milestone {
                    milestone: state.score,
                })
                .with_snapshot(&after),
            );
        }
        if state.score > state.high_score {
            let previous = state.high_score;
            state.high_score = state.score;
            events.push(
                GameEvent::info(Severity::High, EventCategory::Achievement, "New high score!")
                    .with_details(&Details::HighScore {
                        new_high_score: state.score,
                        previous_high_score: previous,
                    })
                    .with_snapshot(&after),
            );
        }
        events.push(
            GameEvent::info(Severity::Low, EventCategory::GameMechanics, "Food eaten")
                .with_details(&Details::FoodEaten {
                    new_score: state.score,
                    food_position: eaten,
                })
                .with_snapshot(&after),
        );

        if next_food.is_none() {
            // Nowhere left to put food: the snake fills the board
            events.push(game_over_event(state, head));
            state.game_over = true;
        }
        events
    }

    fn turn(&self, state: &mut State, direction: Direction) -> Result<Vec<GameEvent>, RuleError> {
        if state.paused {
            return Err(RuleError::Paused);
        }
        if direction == state.direction {
            return Ok(Vec::new());
        }
        if direction == state.last_moved.opposite() {
            return Err(RuleError::illegal(format!(
                "cannot reverse from {:?} to {:?}",
                state.last_moved, direction
            )));
        }

        let old = state.direction;
        state.direction = direction;
        Ok(vec![GameEvent::info(
            Severity::Low,
            EventCategory::Input,
            "Direction changed",
        )
        .with_details(&Details::DirectionChanged {
            old_direction: old,
            new_direction: direction,
        })
        .with_snapshot(&state.snapshot_at(state.head()))])
    }

    fn restart(&self, state: &mut State, rng: &mut ChaCha20Rng) -> Vec<GameEvent> {
        let mut next = State::fresh(state.high_score, FIRST_FOOD);
        let mut events = Vec::new();
        if let Some(food) = next.random_free_cell(rng) {
            next.food = food;
            events.push(
                GameEvent::info(Severity::Low, EventCategory::GameMechanics, "Food generated")
                    .with_details(&Details::FoodGenerated { food })
                    .with_snapshot(&next.snapshot_at(START)),
            );
        }
        events.push(
            GameEvent::info(Severity::Low, EventCategory::GameState, "Game Reset")
                .with_snapshot(&next.snapshot_at(START)),
        );
        *state = next;
        events
    }
}

fn game_over_event(state: &State, position: Point) -> GameEvent {
    GameEvent::info(Severity::Medium, EventCategory::GameState, "Game Over")
        .with_details(&Details::GameOver {
            final_score: state.score,
        })
        .with_snapshot(&state.snapshot_at(position))
}

impl Game for Snake {
    type State = State;
    type Input = Input;
    type Snapshot = Snapshot;

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("snake", "Snake")
            .with_board(GRID_SIZE, GRID_SIZE)
            .with_tick_interval(TICK_INTERVAL_MS)
            .with_inputs(&["tick", "turn", "togglePause", "restart"])
            .with_description("Eat the food, grow longer, and avoid the walls and your own tail!")
    }

    fn initialize(&self, _rng: &mut ChaCha20Rng) -> State {
        State::fresh(0, FIRST_FOOD)
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
            Input::Tick => Ok(self.tick(state, rng)),
            Input::Turn { direction } => self.turn(state, direction),
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
                .with_snapshot(&state.snapshot_at(state.head()))])
            }
            Input::Restart => Ok(self.restart(state, rng)),
        }
    }

    fn is_terminal(&self, state: &State) -> bool {
        state.game_over
    }

    fn snapshot(&self, state: &State) -> Snapshot {
        state.snapshot_at(state.head())
    }
}
