/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for lock release operations
pub type LockResult<T> = Result<T, LockError>;

/// Result type for guard operations
pub type GuardResult<T> = Result<T, GuardError>;

/// Lock misuse errors
///
/// Every variant belongs to the IllegalState class: a release that has no
/// matching acquire on the calling thread.
#[derive(Error, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", rename_all = "snake_case")]
pub enum LockError {
    #[error("Illegal state: exclusive release while no writer holds the lock")]
    #[diagnostic(
        code(rwlock::illegal_state::no_writer),
        help("Every release_exclusive must be paired with a prior acquire_exclusive.")
    )]
    NoWriter,

    #[error("Illegal state: exclusive release by a thread that does not own the lock")]
    #[diagnostic(
        code(rwlock::illegal_state::not_owner),
        help("Only the writer thread may release exclusive access.")
    )]
    NotOwner,

    #[error("Illegal state: shared release by a thread holding no shared access")]
    #[diagnostic(
        code(rwlock::illegal_state::not_reader),
        help("Every release_shared must be paired with a prior acquire_shared on the same thread.")
    )]
    NotReader,
}

impl LockError {
    /// All lock errors are IllegalState errors
    #[inline]
    pub fn is_illegal_state(&self) -> bool {
        true
    }
}

/// Errors that can occur during guard operations
#[derive(Error, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum GuardError {
    #[error("Resource already released")]
    #[diagnostic(code(guard::already_released))]
    AlreadyReleased,

    #[error("Lock release failed: {0}")]
    #[diagnostic(code(guard::lock))]
    Lock(#[from] LockError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_error_display() {
        assert!(LockError::NotOwner.to_string().contains("does not own"));
        assert!(LockError::NotReader.is_illegal_state());
    }

    #[test]
    fn test_lock_error_serializes_tagged() {
        let json = serde_json::to_string(&LockError::NoWriter).unwrap();
        assert_eq!(json, r#"{"error_type":"no_writer"}"#);
    }

    #[test]
    fn test_guard_error_from_lock_error() {
        let err: GuardError = LockError::NotReader.into();
        assert_eq!(err, GuardError::Lock(LockError::NotReader));
    }
}
