//! Error types for QuestKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for QuestKV operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("key not found")]
    NotFound,

    #[error("email already registered: {0}")]
    AlreadyExists(String),

    #[error("no quests available")]
    QueueEmpty,

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    #[error("corrupt snapshot data: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// True for the expected, recoverable outcomes a caller must handle
    /// (as opposed to IO failures and corrupt snapshots).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound | StoreError::AlreadyExists(_) | StoreError::QueueEmpty
        )
    }
}
