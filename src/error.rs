// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Lesson not found: {0}")]
    LessonNotFound(String),

    #[error("Progress for user {user_id} was modified concurrently")]
    ConcurrentUpdate { user_id: String },

    #[error("Invalid level table: {0}")]
    InvalidTable(String),

    #[error("Corrupt progress record: {0}")]
    CorruptRecord(String),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Seed data error: {0}")]
    Seed(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProgressError {
    /// Whether the whole load-compute-save cycle should be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProgressError::ConcurrentUpdate { .. })
    }
}

pub type Result<T> = std::result::Result<T, ProgressError>;
