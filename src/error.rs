//! Error types shared by the whole crate.

use thiserror::Error;

/// Errors surfaced by actions, states and the store.
///
/// All variants are contract violations on the caller's side except
/// [`StoreError::Notifier`], which reports an OS-level failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Type mismatch: expected '{expected}', found '{found}'")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Notification worker could not be started: {0}")]
    Notifier(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
