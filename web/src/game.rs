//! Game session management
//!
//! Wraps the EngineContext with what the web server adds on top of the rule
//! engines: computer turns with a thinking pause, the runaway guard, and
//! forwarding of every emitted event to the log emitter.

use engine_config::GamesConfig;
use engine_core::{
    EngineContext, EngineError, EventCategory, GameEvent, GuardVerdict, Registry, RuleError,
    RunawayGuard, Severity,
};
use logbook::{LogDraft, LogEmitter};
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::metrics;
use crate::types::GameStateResponse;

/// `details` of the runaway error event
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunawayDetails {
    move_count: usize,
    time_window: u64,
    player_name: String,
    game_state: Value,
}

/// Computer moves played after one player input
#[derive(Debug, Default)]
pub struct BotTurns {
    pub moves: usize,
    pub events: Vec<GameEvent>,
    /// Engine failure that stopped the computer early
    pub error: Option<String>,
}

/// A game session tracking current state
pub struct GameSession {
    ctx: EngineContext,
    guard: RunawayGuard,
    /// Thinking pause before each computer move
    ai_delay: Duration,
    /// Set once the terminal state has been counted
    completed: bool,
}

impl GameSession {
    /// Start `env_id`, seeded with `seed` or the current time
    pub fn new(
        registry: &Registry,
        env_id: &str,
        seed: Option<u64>,
        games: &GamesConfig,
    ) -> Result<Self, EngineError> {
        let seed = seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        });
        let ctx = EngineContext::new(registry, env_id, seed)?;
        info!(game = env_id, seed, "New game session");
        metrics::GAMES_CREATED.with_label_values(&[env_id]).inc();

        Ok(Self {
            ctx,
            guard: RunawayGuard::new(games.runaway_max_actions, games.runaway_window()),
            ai_delay: games.ai_delay(env_id),
            completed: false,
        })
    }

    pub fn env_id(&self) -> String {
        self.ctx.env_id()
    }

    /// Apply one player input; on error the state is unchanged
    ///
    /// Computer-seat inputs are refused here so that every automated move
    /// goes through `play_bot_turns` and the runaway guard.
    pub fn apply_player_input(&mut self, input: &Value) -> Result<Vec<GameEvent>, EngineError> {
        if self.ctx.metadata().is_bot_input(input) {
            metrics::INPUTS_REJECTED.inc();
            return Err(EngineError::Rule(RuleError::illegal(
                "computer turns are played by the server",
            )));
        }

        match self.ctx.apply(input) {
            Ok(step) => {
                metrics::INPUTS_APPLIED.inc();
                self.note_terminal(step.terminal);
                Ok(step.events)
            }
            Err(e) => {
                metrics::INPUTS_REJECTED.inc();
                debug!(error = %e, "Input rejected");
                Err(e)
            }
        }
    }

    /// Let the computer seats act until it is a human's turn again
    ///
    /// Each move is recorded with the runaway guard first; if the guard trips,
    /// a high-severity error event is emitted and automated play stops until
    /// the next new game. Events are forwarded to `emitter` as they happen.
    /// An engine failure ends the loop; moves already played are kept and the
    /// failure is reported in `BotTurns::error`.
    pub async fn play_bot_turns(&mut self, emitter: &LogEmitter) -> BotTurns {
        let mut turns = BotTurns::default();
        if let Err(e) = self.run_bot_turns(emitter, &mut turns).await {
            warn!(game = %self.ctx.env_id(), error = %e, "Computer turn failed");
            turns.error = Some(e.to_string());
        }
        turns
    }

    async fn run_bot_turns(
        &mut self,
        emitter: &LogEmitter,
        turns: &mut BotTurns,
    ) -> Result<(), EngineError> {
        while !self.ctx.is_terminal()? {
            let Some(input) = self.ctx.bot_input()? else {
                break;
            };

            match self.guard.record(Instant::now()) {
                GuardVerdict::Allowed => {}
                GuardVerdict::Tripped { count, window_ms } => {
                    let event = self.runaway_event(count, window_ms)?;
                    record_events(emitter, std::slice::from_ref(&event)).await;
                    turns.events.push(event);
                    metrics::RUNAWAY_HALTS.inc();
                    break;
                }
                GuardVerdict::Halted => break,
            }

            if !self.ai_delay.is_zero() {
                tokio::time::sleep(self.ai_delay).await;
            }

            let timer = metrics::BOT_MOVE_SECONDS.start_timer();
            let step = self.ctx.apply(&input)?;
            timer.observe_duration();
            metrics::BOT_MOVES.inc();
            turns.moves += 1;

            record_events(emitter, &step.events).await;
            turns.events.extend(step.events);
            self.note_terminal(step.terminal);
        }

        Ok(())
    }

    fn runaway_event(&self, count: usize, window_ms: u64) -> Result<GameEvent, EngineError> {
        let metadata = self.ctx.metadata();
        let snapshot = self.ctx.snapshot()?;
        // Games with several computer seats name the one on turn in their snapshot
        let player_name = snapshot
            .get("currentPlayer")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| metadata.player_names.last().cloned())
            .unwrap_or_default();

        warn!(game = %metadata.env_id, count, window_ms, "Halting runaway computer player");
        Ok(GameEvent::error(
            Severity::High,
            EventCategory::Automation,
            format!(
                "Detected runaway AI in {} - {} moves in {}ms",
                metadata.display_name, count, window_ms
            ),
        )
        .with_details(&RunawayDetails {
            move_count: count,
            time_window: window_ms,
            player_name,
            game_state: snapshot,
        }))
    }

    fn note_terminal(&mut self, terminal: bool) {
        if terminal && !self.completed {
            self.completed = true;
            metrics::GAMES_COMPLETED.inc();
            info!(game = %self.ctx.env_id(), "Game completed");
        } else if !terminal {
            // Restart inputs bring a finished game back to life
            self.completed = false;
        }
    }

    pub fn to_response(&self) -> Result<GameStateResponse, EngineError> {
        Ok(GameStateResponse {
            game: self.ctx.env_id(),
            seed: self.ctx.seed(),
            state: self.ctx.state().clone(),
            snapshot: self.ctx.snapshot()?,
            game_over: self.ctx.is_terminal()?,
            automation_halted: self.guard.is_halted(),
        })
    }
}

/// Forward events to the emitter, counting successes and failures
pub async fn record_events(emitter: &LogEmitter, events: &[GameEvent]) {
    for event in events {
        match emitter
            .record_best_effort(LogDraft::from(event.clone()))
            .await
        {
            Some(_) => metrics::LOGS_WRITTEN.inc(),
            None => metrics::LOG_WRITE_FAILURES.inc(),
        }
    }
}
