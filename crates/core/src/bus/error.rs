//! Error types for the process bus.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for bus operations.
pub type BusResult<T> = Result<T, BusError>;

/// Errors that can occur while feeding the store from the bus.
#[derive(Debug, Error)]
pub enum BusError {
    /// A frame could not be decoded into an event.
    ///
    /// The frame is discarded; later frames are still processed.
    #[error("Malformed bus event: {reason}")]
    MalformedEvent { reason: String },

    /// The store rejected the mutation an event mapped to.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The task owning the store has stopped.
    #[error("Process store task is no longer running")]
    Disconnected,
}

impl From<serde_json::Error> for BusError {
    fn from(source: serde_json::Error) -> Self {
        BusError::MalformedEvent {
            reason: source.to_string(),
        }
    }
}
