//! Process bus protocol.
//!
//! This module defines the events a live backend pushes to the store's
//! bus plugin. Each event maps onto exactly one store mutation:
//! - `ProcessStarted` -> upsert
//! - `ProcessEnded` -> remove
//! - `ProcessSnapshot` -> replace the whole list
//!
//! The transport carrying these frames is not part of this crate; only the
//! frame encoding is.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::process_models::{Process, ProcessId};

/// Events sent from the live backend to the process store.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "processStarted",
///   "payload": {
///     "id": 4242,
///     "name": "bash"
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A process has started (or was renamed).
    ProcessStarted {
        #[ts(type = "number")]
        id: ProcessId,
        name: String,
    },

    /// A process has exited.
    ProcessEnded {
        #[ts(type = "number")]
        id: ProcessId,
    },

    /// Full list of processes currently alive on the backend.
    ///
    /// Sent on connect and whenever the backend resynchronizes.
    ProcessSnapshot { processes: Vec<Process> },
}

impl Event {
    /// Wire tag of this event, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::ProcessStarted { .. } => "processStarted",
            Event::ProcessEnded { .. } => "processEnded",
            Event::ProcessSnapshot { .. } => "processSnapshot",
        }
    }
}
