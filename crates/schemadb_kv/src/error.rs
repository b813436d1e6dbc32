//! Error types for engine operations.

use std::io;
use thiserror::Error;

/// Result type for engine operations.
pub type KvResult<T> = Result<T, KvError>;

/// Errors that can occur inside a key-value engine.
#[derive(Debug, Error)]
pub enum KvError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The engine is closed.
    #[error("engine is closed")]
    Closed,

    /// Stored data is corrupted.
    #[error("engine corrupted: {0}")]
    Corrupted(String),
}
