use thiserror::Error;

/// Failures of the log pipeline
#[derive(Debug, Error)]
pub enum LogError {
    /// A record is missing a required field or carries an invalid value
    #[error("{0}")]
    Validation(String),

    /// The database refused or failed the operation
    #[error("storage error: {0}")]
    Storage(String),

    /// Stored or submitted JSON could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LogError {
    pub fn is_validation(&self) -> bool {
        matches!(self, LogError::Validation(_))
    }
}

impl From<rusqlite::Error> for LogError {
    fn from(e: rusqlite::Error) -> Self {
        LogError::Storage(e.to_string())
    }
}

impl From<std::io::Error> for LogError {
    fn from(e: std::io::Error) -> Self {
        LogError::Storage(e.to_string())
    }
}
