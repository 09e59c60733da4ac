//! Prometheus metrics for the web server component.
//!
//! Counts game sessions, applied inputs, computer moves and log writes.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Once;
use tracing::warn;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ========== Game Session Metrics ==========

    /// Total game sessions created, by game
    pub static ref GAMES_CREATED: IntCounterVec = IntCounterVec::new(
        Opts::new("web_games_created_total", "Total game sessions created"),
        &["game"]
    ).unwrap();

    /// Player inputs accepted by a rule engine
    pub static ref INPUTS_APPLIED: IntCounter = IntCounter::with_opts(
        Opts::new("web_inputs_applied_total", "Total player inputs applied")
    ).unwrap();

    /// Player inputs rejected by a rule engine
    pub static ref INPUTS_REJECTED: IntCounter = IntCounter::with_opts(
        Opts::new("web_inputs_rejected_total", "Total player inputs rejected")
    ).unwrap();

    /// Games that reached a terminal state
    pub static ref GAMES_COMPLETED: IntCounter = IntCounter::with_opts(
        Opts::new("web_games_completed_total", "Total games completed")
    ).unwrap();

    // ========== Computer Player Metrics ==========

    /// Moves made by computer seats
    pub static ref BOT_MOVES: IntCounter = IntCounter::with_opts(
        Opts::new("web_bot_moves_total", "Total computer moves played")
    ).unwrap();

    /// Time for the engine to apply one computer move (excludes thinking pause)
    pub static ref BOT_MOVE_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new("web_bot_move_seconds", "Time to apply a computer move")
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1])
    ).unwrap();

    /// Sessions whose automated play was halted by the runaway guard
    pub static ref RUNAWAY_HALTS: IntCounter = IntCounter::with_opts(
        Opts::new("web_runaway_halts_total", "Automated play halted by the runaway guard")
    ).unwrap();

    // ========== Log Metrics ==========

    /// Log entries stored
    pub static ref LOGS_WRITTEN: IntCounter = IntCounter::with_opts(
        Opts::new("web_logs_written_total", "Total log entries stored")
    ).unwrap();

    /// Log entries that could not be stored
    pub static ref LOG_WRITE_FAILURES: IntCounter = IntCounter::with_opts(
        Opts::new("web_log_write_failures_total", "Total log writes that failed")
    ).unwrap();
}

static INIT: Once = Once::new();

/// Initialize and register all metrics with the registry.
/// Safe to call multiple times - only initializes once.
pub fn init_metrics() {
    INIT.call_once(|| {
        REGISTRY.register(Box::new(GAMES_CREATED.clone())).unwrap();
        REGISTRY.register(Box::new(INPUTS_APPLIED.clone())).unwrap();
        REGISTRY
            .register(Box::new(INPUTS_REJECTED.clone()))
            .unwrap();
        REGISTRY
            .register(Box::new(GAMES_COMPLETED.clone()))
            .unwrap();
        REGISTRY.register(Box::new(BOT_MOVES.clone())).unwrap();
        REGISTRY
            .register(Box::new(BOT_MOVE_SECONDS.clone()))
            .unwrap();
        REGISTRY.register(Box::new(RUNAWAY_HALTS.clone())).unwrap();
        REGISTRY.register(Box::new(LOGS_WRITTEN.clone())).unwrap();
        REGISTRY
            .register(Box::new(LOG_WRITE_FAILURES.clone()))
            .unwrap();
    });
}

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8(buffer).unwrap_or_default()
}
