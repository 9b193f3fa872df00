//! Error types for store mutations.

use miru_protocol::ProcessId;
use thiserror::Error;

/// Result type for store mutations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when mutating the process store.
///
/// A failed mutation never changes the stored state and never notifies
/// subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The process carries an identity the store cannot track.
    #[error("Invalid process {id}: {reason}")]
    InvalidProcess { id: ProcessId, reason: String },

    /// A replacement list names the same process id more than once.
    #[error("Duplicate process id {id} in replacement list")]
    DuplicateProcessId { id: ProcessId },
}
