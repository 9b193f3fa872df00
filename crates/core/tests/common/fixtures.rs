//! Test fixtures for building bus frames and observing the store.

use miru_core::store::{ProcessStore, Snapshot};
use miru_protocol::ipc::Event;
use miru_protocol::process_models::{Process, ProcessId};
use std::sync::{Arc, Mutex};

/// Encode a `processStarted` frame.
#[allow(dead_code)]
pub fn started_frame(id: ProcessId, name: &str) -> String {
    encode(&Event::ProcessStarted {
        id,
        name: name.to_string(),
    })
}

/// Encode a `processEnded` frame.
#[allow(dead_code)]
pub fn ended_frame(id: ProcessId) -> String {
    encode(&Event::ProcessEnded { id })
}

/// Encode a `processSnapshot` frame.
#[allow(dead_code)]
pub fn snapshot_frame(processes: &[(ProcessId, &str)]) -> String {
    encode(&Event::ProcessSnapshot {
        processes: processes
            .iter()
            .map(|(id, name)| Process::new(*id, *name))
            .collect(),
    })
}

fn encode(event: &Event) -> String {
    serde_json::to_string(event).expect("Failed to encode event")
}

/// Build a process list from `(id, name)` pairs.
#[allow(dead_code)]
pub fn processes(pairs: &[(ProcessId, &str)]) -> Vec<Process> {
    pairs.iter().map(|(id, name)| Process::new(*id, *name)).collect()
}

/// Subscribe a callback that records every snapshot it receives.
#[allow(dead_code)]
pub fn record_snapshots(store: &mut ProcessStore) -> Arc<Mutex<Vec<Snapshot>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |snapshot| {
        sink.lock().expect("recorder poisoned").push(Arc::clone(snapshot));
        Ok(())
    });
    seen
}
