//! Request types for the web API.

use chrono::{DateTime, TimeZone, Utc};
use logbook::{is_storable_timestamp, LogEntry, LogType, Severity};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// Request to start a new game.
#[derive(Debug, Default, Deserialize)]
pub struct NewGameRequest {
    /// Game to play (e.g., "snake", "dominoes"); defaults to the configured game
    #[serde(default)]
    pub game: Option<String>,
    /// RNG seed for a reproducible session
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Request to apply one player input to the running game.
#[derive(Debug, Deserialize)]
pub struct InputRequest {
    /// Game-specific input, tagged by `kind` (e.g. `{"kind": "tick"}`)
    pub input: Value,
}

/// Query parameters of `GET /logs`.
#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    #[serde(default, rename = "type")]
    pub log_type: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

/// Query parameters of `GET /logs/timeline`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineQuery {
    /// Offset of the viewer's clock from UTC; server local time when absent
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Body of `POST /logs`.
///
/// Every field is optional at the JSON level so that a missing field is
/// reported as a 400 with our own message instead of a decoder rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogRequest {
    pub id: Option<String>,
    /// RFC 3339 text or epoch milliseconds
    pub timestamp: Option<Value>,
    #[serde(rename = "type")]
    pub log_type: Option<String>,
    pub message: Option<String>,
    pub severity: Option<String>,
    pub category: Option<String>,
    pub details: Option<Value>,
    pub stack: Option<String>,
    pub user_agent: Option<String>,
    pub game_state: Option<Value>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}

fn parse_timestamp(value: Option<&Value>) -> Result<DateTime<Utc>, ApiError> {
    let invalid = || ApiError::bad_request("Invalid timestamp");
    let ts = match value {
        None | Some(Value::Null) => Ok(Utc::now()),
        Some(Value::String(text)) => DateTime::parse_from_rfc3339(text)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|_| invalid()),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }?;
    if is_storable_timestamp(&ts) {
        Ok(ts)
    } else {
        Err(invalid())
    }
}

impl CreateLogRequest {
    /// Validate the submitted record and turn it into a storable entry
    pub fn into_entry(self) -> Result<LogEntry, ApiError> {
        let (Some(id), Some(log_type), Some(message), Some(severity), Some(category)) = (
            present(&self.id),
            present(&self.log_type),
            present(&self.message),
            present(&self.severity),
            present(&self.category),
        ) else {
            return Err(ApiError::bad_request("Missing required fields"));
        };

        let log_type: LogType = log_type
            .parse()
            .map_err(|e: logbook::ParseLevelError| ApiError::bad_request(e.to_string()))?;
        let severity: Severity = severity
            .parse()
            .map_err(|e: logbook::ParseLevelError| ApiError::bad_request(e.to_string()))?;

        Ok(LogEntry {
            id: id.to_string(),
            timestamp: parse_timestamp(self.timestamp.as_ref())?,
            log_type,
            message: message.to_string(),
            severity,
            category: category.to_string(),
            details: self.details.filter(|v| !v.is_null()),
            stack: self.stack,
            user_agent: self.user_agent,
            game_state: self.game_state.filter(|v| !v.is_null()),
        })
    }
}
