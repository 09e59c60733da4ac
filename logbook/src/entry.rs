//! Log record types

use chrono::{DateTime, Datelike, Utc};
use engine_core::{GameEvent, LogType, Severity};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LogError;

/// A stored gameplay or error record
///
/// `details` and `game_state` are opaque JSON at this layer; the producing
/// game decides their shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub log_type: LogType,
    pub message: String,
    pub severity: Severity,
    pub category: String,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub game_state: Option<Value>,
}

/// Whether `ts` has a four-digit year and so survives the RFC 3339 text column
pub fn is_storable_timestamp(ts: &DateTime<Utc>) -> bool {
    (0..=9999).contains(&ts.year())
}

impl LogEntry {
    /// Check the free-text required fields and the timestamp range
    ///
    /// `type` and `severity` are closed enums and cannot be missing once the
    /// entry exists.
    pub fn validate(&self) -> Result<(), LogError> {
        if !is_storable_timestamp(&self.timestamp) {
            return Err(LogError::Validation(format!(
                "Invalid timestamp: {}",
                self.timestamp
            )));
        }

        let missing: Vec<&str> = [
            ("id", &self.id),
            ("message", &self.message),
            ("category", &self.category),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LogError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// A log record before the emitter stamps it with id, time and user agent
#[derive(Debug, Clone, PartialEq)]
pub struct LogDraft {
    pub log_type: LogType,
    pub severity: Severity,
    pub category: String,
    pub message: String,
    pub details: Option<Value>,
    pub stack: Option<String>,
    pub game_state: Option<Value>,
}

impl LogDraft {
    pub fn new(
        log_type: LogType,
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            log_type,
            severity,
            category: category.into(),
            message: message.into(),
            details: None,
            stack: None,
            game_state: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_game_state(mut self, game_state: Value) -> Self {
        self.game_state = Some(game_state);
        self
    }
}

impl From<GameEvent> for LogDraft {
    fn from(event: GameEvent) -> Self {
        Self {
            log_type: event.log_type,
            severity: event.severity,
            category: event.category.as_str().to_string(),
            message: event.message,
            details: event.details,
            stack: None,
            game_state: event.game_state,
        }
    }
}
