//! Aggregate counts over the log collection

use engine_core::{LogType, Severity};
use serde::{Deserialize, Serialize};

use crate::entry::LogEntry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub error: u64,
    pub warning: u64,
    pub info: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

/// Totals derived on demand, never stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    pub total: u64,
    pub by_type: TypeCounts,
    pub by_severity: SeverityCounts,
}

impl LogStats {
    /// Same numbers the store computes, from an in-memory collection
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        let mut stats = Self::default();
        for entry in entries {
            stats.add(entry.log_type, entry.severity);
        }
        stats
    }

    fn add(&mut self, log_type: LogType, severity: Severity) {
        self.total += 1;
        match log_type {
            LogType::Error => self.by_type.error += 1,
            LogType::Warning => self.by_type.warning += 1,
            LogType::Info => self.by_type.info += 1,
        }
        match severity {
            Severity::Low => self.by_severity.low += 1,
            Severity::Medium => self.by_severity.medium += 1,
            Severity::High => self.by_severity.high += 1,
        }
    }
}
