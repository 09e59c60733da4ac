//! Gameplay log records and everything that happens to them after a game
//! emits an event.
//!
//! - `LogEntry` / `LogDraft`: the stored record and what callers hand in
//! - `LogStore`: persistence gateway, backed by SQLite in `SqliteLogStore`
//! - `LogEmitter`: stamps drafts with id, time and user agent, then stores them
//! - `dashboard`: time and category buckets, stats and filters over a collection

pub mod dashboard;
pub mod emitter;
pub mod entry;
pub mod error;
pub mod stats;
pub mod store;

pub use dashboard::{bucket_by_category, bucket_by_time, CategoryCount, LogFilter, TimeBucket};
pub use emitter::LogEmitter;
pub use entry::{is_storable_timestamp, LogDraft, LogEntry};
pub use error::LogError;
pub use stats::{LogStats, SeverityCounts, TypeCounts};
pub use store::{LogQuery, LogStore, SqliteLogStore};

// Level vocabulary is shared with the engines
pub use engine_core::{LogType, ParseLevelError, Severity};
