//! Core traits and types for the arcade rule engines
//!
//! This crate provides the fundamental abstractions shared by every game:
//! - `Game`: Typed trait for ergonomic rule-engine development
//! - `ErasedGame`: Runtime interface that works only with JSON values
//! - `GameAdapter`: Automatic conversion from typed to erased interface
//! - `Registry`: Explicit env_id → factory table built at startup
//! - `EngineContext`: High-level API for running one game session
//! - `GameEvent`: Structured record of a notable transition, ready for logging
//! - `RunawayGuard`: Rolling-window limiter for automated (computer) play

pub mod adapter;
pub mod context;
pub mod erased;
pub mod event;
pub mod grid;
pub mod guard;
pub mod metadata;
pub mod registry;
pub mod typed;

// Re-export main types for convenience
pub use adapter::GameAdapter;
pub use context::EngineContext;
pub use erased::{EngineError, ErasedGame};
pub use event::{EventCategory, GameEvent, LogType, ParseLevelError, Severity};
pub use grid::Point;
pub use guard::{GuardVerdict, RunawayGuard};
pub use metadata::GameMetadata;
pub use registry::{GameFactory, Registry};
pub use typed::{Game, RuleError};

#[cfg(test)]
mod adapter_tests;
