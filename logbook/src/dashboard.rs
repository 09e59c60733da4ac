//! Dashboard aggregation over a log collection
//!
//! Everything here is a pure function of the entries passed in; nothing is
//! cached or written back.

use chrono::{DateTime, TimeZone, Utc};
use engine_core::{LogType, ParseLevelError, Severity};
use serde::Serialize;
use std::fmt;

use crate::entry::LogEntry;
use crate::store::LogQuery;

/// Width of one timeline bucket
pub const BUCKET_SECONDS: i64 = 10 * 60;
/// 24 hours of 10-minute buckets, both ends included
pub const TIMELINE_BUCKETS: usize = 145;
/// Number of categories kept by `bucket_by_category`
pub const TOP_CATEGORIES: usize = 10;

/// Per-type counts for one 10-minute slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBucket {
    /// Start of the slot, aligned to a 10-minute boundary
    pub start: DateTime<Utc>,
    /// Clock label such as `12:00 PM`
    pub label: String,
    pub error: u64,
    pub warning: u64,
    pub info: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

fn floor_to_bucket(ts: &DateTime<Utc>) -> i64 {
    let secs = ts.timestamp();
    secs - secs.rem_euclid(BUCKET_SECONDS)
}

/// Split the 24 hours leading up to the latest entry into 10-minute slots
///
/// Always yields `TIMELINE_BUCKETS` rows (oldest first) when there is at
/// least one entry, and none otherwise. Entries older than the window are
/// ignored. Labels are rendered in `tz`.
///
/// `start` is distinct for every row and is the bucket's identity. `label`
/// is only the wall-clock time, so the first and last rows of a full day
/// (24 hours apart) share a label such as `12:00 PM`.
pub fn bucket_by_time<Tz>(logs: &[LogEntry], tz: &Tz) -> Vec<TimeBucket>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let Some(latest) = logs.iter().map(|log| log.timestamp).max() else {
        return Vec::new();
    };
    let first = floor_to_bucket(&latest) - (TIMELINE_BUCKETS as i64 - 1) * BUCKET_SECONDS;

    let mut buckets: Vec<TimeBucket> = (0..TIMELINE_BUCKETS as i64)
        .filter_map(|i| DateTime::<Utc>::from_timestamp(first + i * BUCKET_SECONDS, 0))
        .map(|start| TimeBucket {
            label: start.with_timezone(tz).format("%-I:%M %p").to_string(),
            start,
            error: 0,
            warning: 0,
            info: 0,
        })
        .collect();

    for log in logs {
        let offset = floor_to_bucket(&log.timestamp) - first;
        if offset < 0 {
            continue;
        }
        if let Some(bucket) = buckets.get_mut((offset / BUCKET_SECONDS) as usize) {
            match log.log_type {
                LogType::Error => bucket.error += 1,
                LogType::Warning => bucket.warning += 1,
                LogType::Info => bucket.info += 1,
            }
        }
    }

    buckets
}

/// Most frequent error categories, highest count first
///
/// Only `error` entries count. Ties keep the order in which categories were
/// first seen.
pub fn bucket_by_category(logs: &[LogEntry]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for log in logs.iter().filter(|log| log.log_type == LogType::Error) {
        match counts.iter_mut().find(|c| c.category == log.category) {
            Some(c) => c.count += 1,
            None => counts.push(CategoryCount {
                category: log.category.clone(),
                count: 1,
            }),
        }
    }
    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_CATEGORIES);
    counts
}

/// Dashboard filter: exact type and severity, substring search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub log_type: Option<LogType>,
    pub severity: Option<Severity>,
    /// Matched case-insensitively against message and category
    pub search: Option<String>,
}

impl LogFilter {
    /// Build from loose text parameters
    ///
    /// A missing, empty or `all` value leaves that dimension unfiltered.
    pub fn from_params(
        log_type: Option<&str>,
        severity: Option<&str>,
        search: Option<&str>,
    ) -> Result<Self, ParseLevelError> {
        fn level<T: std::str::FromStr<Err = ParseLevelError>>(
            value: Option<&str>,
        ) -> Result<Option<T>, ParseLevelError> {
            match value.map(str::trim) {
                None | Some("") | Some("all") => Ok(None),
                Some(v) => v.parse().map(Some),
            }
        }

        Ok(Self {
            log_type: level(log_type)?,
            severity: level(severity)?,
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
        })
    }

    /// The part of the filter the store can evaluate
    pub fn store_query(&self) -> LogQuery {
        LogQuery {
            log_type: self.log_type,
            severity: self.severity,
        }
    }

    pub fn matches(&self, log: &LogEntry) -> bool {
        if self.log_type.is_some_and(|t| t != log.log_type) {
            return false;
        }
        if self.severity.is_some_and(|s| s != log.severity) {
            return false;
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                log.message.to_lowercase().contains(&term)
                    || log.category.to_lowercase().contains(&term)
            }
            None => true,
        }
    }

    pub fn apply(&self, logs: Vec<LogEntry>) -> Vec<LogEntry> {
        logs.into_iter().filter(|log| self.matches(log)).collect()
    }
}
