//! SQLite backend for log storage.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

use super::{LogQuery, LogStore};
use crate::entry::LogEntry;
use crate::error::LogError;
use crate::stats::{LogStats, SeverityCounts, TypeCounts};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS game_logs (
        id TEXT PRIMARY KEY,
        timestamp TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('error', 'info', 'warning')),
        message TEXT NOT NULL,
        severity TEXT NOT NULL CHECK(severity IN ('low', 'medium', 'high')),
        category TEXT NOT NULL,
        details TEXT,
        stack TEXT,
        user_agent TEXT,
        game_state TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_game_logs_timestamp ON game_logs(timestamp);
";

/// SQLite-backed log store.
///
/// Uses a Mutex for thread-safety since rusqlite Connection is not Sync.
/// The connection is dropped from the slot by `close`.
pub struct SqliteLogStore {
    conn: Mutex<Option<Connection>>,
}

impl SqliteLogStore {
    /// Open (or create) the database file, creating parent directories and
    /// the schema if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LogError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        info!(path = %path.display(), "Opened log database");
        Self::with_connection(conn)
    }

    /// Private in-memory database, for tests and throwaway sessions
    pub fn open_in_memory() -> Result<Self, LogError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, LogError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, LogError>,
    ) -> Result<T, LogError> {
        let guard = self
            .conn
            .lock()
            .map_err(|e| LogError::Storage(format!("Lock poisoned: {}", e)))?;
        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(LogError::Storage("log store is closed".into())),
        }
    }
}

fn encode_json(value: &Option<Value>) -> Result<Option<String>, LogError> {
    value
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(LogError::from)
}

fn decode_json(text: Option<String>) -> Result<Option<Value>, LogError> {
    match text {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Fixed-width UTC text so that lexical order is chronological order
fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Columns exactly as stored, before parsing
struct StoredRow {
    id: String,
    timestamp: String,
    log_type: String,
    message: String,
    severity: String,
    category: String,
    details: Option<String>,
    stack: Option<String>,
    user_agent: Option<String>,
    game_state: Option<String>,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            log_type: row.get(2)?,
            message: row.get(3)?,
            severity: row.get(4)?,
            category: row.get(5)?,
            details: row.get(6)?,
            stack: row.get(7)?,
            user_agent: row.get(8)?,
            game_state: row.get(9)?,
        })
    }

    fn into_entry(self) -> Result<LogEntry, LogError> {
        let corrupt = |what: &str, e: &dyn std::fmt::Display| {
            LogError::Storage(format!("bad {} in row {}: {}", what, self.id, e))
        };
        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .map_err(|e| corrupt("timestamp", &e))?
            .with_timezone(&Utc);
        let log_type = self.log_type.parse().map_err(|e| corrupt("type", &e))?;
        let severity = self.severity.parse().map_err(|e| corrupt("severity", &e))?;

        Ok(LogEntry {
            timestamp,
            log_type,
            severity,
            details: decode_json(self.details)?,
            game_state: decode_json(self.game_state)?,
            id: self.id,
            message: self.message,
            category: self.category,
            stack: self.stack,
            user_agent: self.user_agent,
        })
    }
}

#[async_trait]
impl LogStore for SqliteLogStore {
    async fn insert(&self, entry: &LogEntry) -> Result<(), LogError> {
        entry.validate()?;
        let details = encode_json(&entry.details)?;
        let game_state = encode_json(&entry.game_state)?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO game_logs
                 (id, timestamp, type, message, severity, category,
                  details, stack, user_agent, game_state)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    entry.id,
                    encode_timestamp(&entry.timestamp),
                    entry.log_type.as_str(),
                    entry.message,
                    entry.severity.as_str(),
                    entry.category,
                    details,
                    entry.stack,
                    entry.user_agent,
                    game_state,
                ],
            )?;
            Ok(())
        })?;
        debug!(id = %entry.id, category = %entry.category, "Stored log entry");
        Ok(())
    }

    async fn list(&self, query: &LogQuery) -> Result<Vec<LogEntry>, LogError> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id, timestamp, type, message, severity, category,
                        details, stack, user_agent, game_state
                 FROM game_logs
                 WHERE (?1 IS NULL OR type = ?1) AND (?2 IS NULL OR severity = ?2)
                 ORDER BY timestamp DESC",
            )?;
            let rows = stmt
                .query_map(
                    params![
                        query.log_type.map(|t| t.as_str()),
                        query.severity.map(|s| s.as_str()),
                    ],
                    StoredRow::from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;

        rows.into_iter().map(StoredRow::into_entry).collect()
    }

    async fn clear_all(&self) -> Result<(), LogError> {
        let removed = self.with_conn(|conn| Ok(conn.execute("DELETE FROM game_logs", [])?))?;
        info!(removed, "Cleared log entries");
        Ok(())
    }

    async fn compute_stats(&self) -> Result<LogStats, LogError> {
        self.with_conn(|conn| {
            let stats = conn.query_row(
                "SELECT
                    COUNT(*),
                    COALESCE(SUM(CASE WHEN type = 'error' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN type = 'warning' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN type = 'info' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN severity = 'low' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN severity = 'medium' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN severity = 'high' THEN 1 ELSE 0 END), 0)
                 FROM game_logs",
                [],
                |row| {
                    let count = |i: usize| row.get::<_, i64>(i).map(|n| n as u64);
                    Ok(LogStats {
                        total: count(0)?,
                        by_type: TypeCounts {
                            error: count(1)?,
                            warning: count(2)?,
                            info: count(3)?,
                        },
                        by_severity: SeverityCounts {
                            low: count(4)?,
                            medium: count(5)?,
                            high: count(6)?,
                        },
                    })
                },
            )?;
            Ok(stats)
        })
    }

    async fn close(&self) -> Result<(), LogError> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|e| LogError::Storage(format!("Lock poisoned: {}", e)))?;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| LogError::from(e))?;
            info!("Closed log database");
        }
        Ok(())
    }
}
