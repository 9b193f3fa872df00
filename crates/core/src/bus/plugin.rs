//! Event-to-mutation translation.
//!
//! The plugin keeps no state of its own. Every event maps onto exactly one
//! store mutation, and every failure is logged and swallowed so that a bad
//! frame can never stall the stream behind it.

use miru_protocol::ipc::Event;
use miru_protocol::process_models::Process;
use tracing::{debug, warn};

use crate::bus::error::BusResult;
use crate::store::ProcessStore;

/// Outcome of delivering one frame or event to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The store applied a mutation.
    Applied,
    /// The event was valid but had nothing to do (e.g. ending an untracked process).
    Unchanged,
    /// The frame was malformed or the store rejected it.
    Discarded,
}

/// Decode a raw JSON frame into an [`Event`].
///
/// # Errors
///
/// Returns [`BusError::MalformedEvent`] for invalid JSON, an unknown event
/// type, a missing field or a field of the wrong type.
pub fn decode_event(raw: &str) -> BusResult<Event> {
    Ok(serde_json::from_str(raw)?)
}

/// Bridges bus events into [`ProcessStore`] mutations.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusPlugin;

impl BusPlugin {
    pub fn new() -> Self {
        Self
    }

    /// Apply an event to the store, reporting failures to the caller.
    ///
    /// # Returns
    ///
    /// `true` if the store changed, `false` if the event was a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Store`] if the store rejected the mutation.
    pub fn apply(&self, store: &mut ProcessStore, event: Event) -> BusResult<bool> {
        match event {
            Event::ProcessStarted { id, name } => {
                store.add_process(Process::new(id, name))?;
                Ok(true)
            }
            Event::ProcessEnded { id } => Ok(store.remove_process(id)),
            Event::ProcessSnapshot { processes } => {
                store.replace_all(processes)?;
                Ok(true)
            }
        }
    }

    /// Apply an event, logging and discarding it if the store rejects it.
    pub fn handle_event(&self, store: &mut ProcessStore, event: Event) -> Delivery {
        let kind = event.kind();
        match self.apply(store, event) {
            Ok(true) => Delivery::Applied,
            Ok(false) => {
                debug!(event = kind, "bus event left process list unchanged");
                Delivery::Unchanged
            }
            Err(error) => {
                warn!(event = kind, error = %error, "discarding rejected bus event");
                Delivery::Discarded
            }
        }
    }

    /// Decode and apply a raw frame.
    ///
    /// Malformed frames are logged and discarded.
    pub fn handle_frame(&self, store: &mut ProcessStore, raw: &str) -> Delivery {
        match decode_event(raw) {
            Ok(event) => self.handle_event(store, event),
            Err(error) => {
                warn!(error = %error, frame_len = raw.len(), "discarding malformed bus event");
                Delivery::Discarded
            }
        }
    }
}
