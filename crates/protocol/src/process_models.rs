//! Tracked process models.
//!
//! This module defines the structures held by the process store and handed
//! to subscribers as snapshots.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Identifier of a tracked process.
///
/// Signed so that a negative id coming off the wire can be rejected by the
/// store instead of wrapping into a valid-looking pid.
pub type ProcessId = i64;

/// A single tracked process, represented as an ordered `(id, name)` pair.
///
/// Serializes as a two-element array so the browser client can keep using
/// its `[number, string]` tuple type:
///
/// ```json
/// [4242, "bash"]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, TS)]
pub struct Process(#[ts(type = "number")] pub ProcessId, pub String);

impl Process {
    /// Create a process entry from its id and display name.
    pub fn new(id: ProcessId, name: impl Into<String>) -> Self {
        Self(id, name.into())
    }

    /// The process identifier.
    pub fn id(&self) -> ProcessId {
        self.0
    }

    /// Human-readable label, usually the command name.
    pub fn name(&self) -> &str {
        &self.1
    }
}

impl From<(ProcessId, String)> for Process {
    fn from((id, name): (ProcessId, String)) -> Self {
        Self(id, name)
    }
}

/// The full state of the process store.
///
/// Entries are unique by id. Their order is the order in which they were
/// first inserted and only matters for display.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
pub struct ProcessState {
    /// Currently tracked processes.
    pub processes: Vec<Process>,
}

impl ProcessState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the entry with the given id, if tracked.
    pub fn position(&self, id: ProcessId) -> Option<usize> {
        self.processes.iter().position(|p| p.id() == id)
    }

    /// Look up an entry by id.
    pub fn get(&self, id: ProcessId) -> Option<&Process> {
        self.processes.iter().find(|p| p.id() == id)
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}
