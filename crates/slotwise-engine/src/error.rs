//! Error types for slotwise-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    /// A referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A storage collaborator failed. Propagated as-is, never retried.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Snapshot parse error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl SchedulerError {
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        SchedulerError::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SchedulerError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
