//! Game events emitted by rule engines
//!
//! A rule engine never talks to the log store directly. Instead every notable
//! transition (food eaten, line cleared, capture, game over...) is returned as
//! a `GameEvent`, and the caller decides where it goes. The level enums defined
//! here are shared with the log store so that the `type`/`severity` vocabulary
//! is checked once, at the type level.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Kind of log record an event becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Error,
    Info,
    Warning,
}

impl LogType {
    pub const ALL: [LogType; 3] = [LogType::Error, LogType::Warning, LogType::Info];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Error => "error",
            LogType::Info => "info",
            LogType::Warning => "warning",
        }
    }
}

/// How urgent a log record is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Error returned when a `type` or `severity` string is outside its vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: '{value}'")]
pub struct ParseLevelError {
    pub field: &'static str,
    pub value: String,
}

impl FromStr for LogType {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(LogType::Error),
            "info" => Ok(LogType::Info),
            "warning" => Ok(LogType::Warning),
            other => Err(ParseLevelError {
                field: "type",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for Severity {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            other => Err(ParseLevelError {
                field: "severity",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category tag attached to game events
///
/// The log store keeps categories as free text; games only ever emit one of
/// these, so the set is closed on the engine side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventCategory {
    Collision,
    GameMechanics,
    GameState,
    Achievement,
    Input,
    Dominoes,
    Automation,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Collision => "collision",
            EventCategory::GameMechanics => "game-mechanics",
            EventCategory::GameState => "game-state",
            EventCategory::Achievement => "achievement",
            EventCategory::Input => "input",
            EventCategory::Dominoes => "dominoes",
            EventCategory::Automation => "automation",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notable transition produced by a rule engine
///
/// `details` and `snapshot` are typed on the producing side (each game defines
/// its own tagged detail enum and snapshot struct) and carried here as JSON so
/// that the event can cross the erased game boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    #[serde(rename = "type")]
    pub log_type: LogType,
    pub severity: Severity,
    pub category: EventCategory,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_state: Option<Value>,
}

impl GameEvent {
    pub fn new(
        log_type: LogType,
        severity: Severity,
        category: EventCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            log_type,
            severity,
            category,
            message: message.into(),
            details: None,
            game_state: None,
        }
    }

    /// Shorthand for an `info` event
    pub fn info(severity: Severity, category: EventCategory, message: impl Into<String>) -> Self {
        Self::new(LogType::Info, severity, category, message)
    }

    /// Shorthand for an `error` event
    pub fn error(severity: Severity, category: EventCategory, message: impl Into<String>) -> Self {
        Self::new(LogType::Error, severity, category, message)
    }

    /// Attach typed details, serialized to JSON.
    pub fn with_details<T: Serialize>(mut self, details: &T) -> Self {
        self.details = to_value_or_warn(details);
        self
    }

    /// Attach a typed game-state snapshot, serialized to JSON.
    pub fn with_snapshot<T: Serialize>(mut self, snapshot: &T) -> Self {
        self.game_state = to_value_or_warn(snapshot);
        self
    }
}

// Detail and snapshot types are plain derive(Serialize) structs, so this only
// fails on non-string map keys; the event is still worth keeping without them.
fn to_value_or_warn<T: Serialize>(value: &T) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(error = %e, "Dropping event payload that failed to serialize");
            None
        }
    }
}
