//! Event log emitter
//!
//! Turns drafts into complete `LogEntry` records and forwards them to a store.

use chrono::Utc;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::entry::{LogDraft, LogEntry};
use crate::error::LogError;
use crate::store::LogStore;

#[derive(Clone)]
pub struct LogEmitter {
    store: Arc<dyn LogStore>,
    user_agent: Option<String>,
}

impl LogEmitter {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self {
            store,
            user_agent: None,
        }
    }

    /// Stamp every record with this user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn store(&self) -> &Arc<dyn LogStore> {
        &self.store
    }

    /// Stamp and store a draft, returning the stored record
    pub async fn record(&self, draft: LogDraft) -> Result<LogEntry, LogError> {
        let entry = LogEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            log_type: draft.log_type,
            message: draft.message,
            severity: draft.severity,
            category: draft.category,
            details: draft.details,
            stack: draft.stack,
            user_agent: self.user_agent.clone(),
            game_state: draft.game_state,
        };
        self.store.insert(&entry).await?;
        Ok(entry)
    }

    /// Like `record`, but a failure is only logged
    pub async fn record_best_effort(&self, draft: LogDraft) -> Option<LogEntry> {
        let category = draft.category.clone();
        match self.record(draft).await {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, category = %category, "Failed to record log entry");
                None
            }
        }
    }
}
