//! Error types for flash-avl.
//!
//! Lookups that miss are not errors: they come back as `None` or `false`.
//! Everything here is either a construction-time validation failure, a
//! capacity rejection, or a report from the invariant checker.

use thiserror::Error;

use crate::arena::Handle;

/// Result type alias using AvlError.
pub type Result<T> = std::result::Result<T, AvlError>;

/// Errors that can occur in flash-avl operations.
#[derive(Debug, Error)]
pub enum AvlError {
    // Construction errors
    #[error("Invalid comparator: {name:?} does not name a key ordering")]
    InvalidComparator { name: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Mutation errors
    #[error("Capacity exceeded: tree holds at most {max} entries")]
    CapacityExceeded { max: u32 },

    // Traversal errors
    #[error("Stale cursor: handle {handle} no longer holds the captured key")]
    StaleCursor { handle: Handle },

    // Integrity errors
    #[error("Tree corrupted: {0}")]
    Corrupted(String),

    // Workload errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed workload row {line}: {reason}")]
    MalformedRow { line: u64, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AvlError::InvalidComparator { name: "sideways".to_string() };
        assert_eq!(
            err.to_string(),
            "Invalid comparator: \"sideways\" does not name a key ordering"
        );

        let err = AvlError::CapacityExceeded { max: 8 };
        assert_eq!(err.to_string(), "Capacity exceeded: tree holds at most 8 entries");

        let err = AvlError::StaleCursor { handle: 3 };
        assert!(err.to_string().contains("handle 3"));
    }
}
