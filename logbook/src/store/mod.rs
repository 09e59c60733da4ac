//! Persistence gateway for log records.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logbook::{LogStore, SqliteLogStore};
//!
//! let store = SqliteLogStore::open(config.db_path())?;
//! store.insert(&entry).await?;
//! let recent = store.list_all().await?;
//! ```

mod sqlite;

pub use sqlite::SqliteLogStore;

use async_trait::async_trait;
use engine_core::{LogType, Severity};

use crate::entry::LogEntry;
use crate::error::LogError;
use crate::stats::LogStats;

/// Optional equality filters applied by the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub log_type: Option<LogType>,
    pub severity: Option<Severity>,
}

impl LogQuery {
    pub fn with_type(mut self, log_type: LogType) -> Self {
        self.log_type = Some(log_type);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }
}

/// Abstract interface for log storage.
///
/// Implementations must be thread-safe; the web server shares one store
/// across all request handlers.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Validate and store a single entry
    async fn insert(&self, entry: &LogEntry) -> Result<(), LogError>;

    /// Entries matching `query`, most recent first
    async fn list(&self, query: &LogQuery) -> Result<Vec<LogEntry>, LogError>;

    /// Every entry, most recent first
    async fn list_all(&self) -> Result<Vec<LogEntry>, LogError> {
        self.list(&LogQuery::default()).await
    }

    /// Delete every entry
    async fn clear_all(&self) -> Result<(), LogError>;

    /// Total and per-level counts over the whole collection
    async fn compute_stats(&self) -> Result<LogStats, LogError>;

    /// Release the underlying connection; later calls fail with a storage error
    async fn close(&self) -> Result<(), LogError>;
}
