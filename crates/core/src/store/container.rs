//! The process store.
//!
//! [`ProcessStore`] owns the tracked process list. Consumers only ever see
//! it through shared borrows or immutable [`Snapshot`]s; the only way to
//! change it is one of the three mutations (`add_process`,
//! `remove_process`, `replace_all`). Each successful mutation bumps the
//! revision and notifies every subscriber once.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use miru_protocol::config_models::StoreConfig;
use miru_protocol::process_models::{Process, ProcessId, ProcessState};
use tracing::debug;

use crate::store::error::{StoreError, StoreResult};
use crate::store::subscribers::{Callback, Subscribers, SubscriptionId};

/// Immutable view of the store's state at one point in time.
///
/// Snapshots are shared with subscribers by reference count. The store
/// copies its state on write whenever a snapshot is still held elsewhere,
/// so a snapshot never changes after it has been handed out.
pub type Snapshot = Arc<ProcessState>;

/// Central container for the list of running processes.
pub struct ProcessStore {
    /// Current state, shared copy-on-write with outstanding snapshots.
    state: Snapshot,

    /// Number of successful mutations applied so far.
    revision: u64,

    config: StoreConfig,

    subscribers: Subscribers,
}

impl ProcessStore {
    /// Create an empty store with default settings.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store.
    ///
    /// # Arguments
    ///
    /// * `config` - Store settings, usually the `[store]` table of the config file
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            state: Arc::new(ProcessState::new()),
            revision: 0,
            config,
            subscribers: Subscribers::default(),
        }
    }

    /// Insert a process, or replace the entry that has the same id.
    ///
    /// A replaced entry keeps its position in the list; a new entry is
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidProcess`] if the id is negative. The
    /// state is left unchanged.
    pub fn add_process(&mut self, process: Process) -> StoreResult<()> {
        validate_process(&process)?;

        let existing = self.state.position(process.id());
        let unchanged = existing.is_some_and(|index| self.state.processes[index] == process);

        if unchanged {
            if !self.config.notify_unchanged {
                debug!(id = process.id(), "upsert left process list unchanged");
                return Ok(());
            }
        } else {
            let state = Arc::make_mut(&mut self.state);
            match existing {
                Some(index) => state.processes[index] = process,
                None => state.processes.push(process),
            }
        }

        self.commit("add_process");
        Ok(())
    }

    /// Remove the process with the given id.
    ///
    /// Removing an id that is not tracked is a no-op: nothing changes and
    /// subscribers are not notified.
    ///
    /// # Returns
    ///
    /// `true` if an entry was removed.
    pub fn remove_process(&mut self, id: ProcessId) -> bool {
        let Some(index) = self.state.position(id) else {
            debug!(id, "remove of untracked process ignored");
            return false;
        };

        Arc::make_mut(&mut self.state).processes.remove(index);
        self.commit("remove_process");
        true
    }

    /// Replace the whole process list.
    ///
    /// The list is validated before anything is touched, so either every
    /// entry is applied or none is. Replacing the list with an identical one
    /// is silent when `notify_unchanged` is disabled.
    ///
    /// # Errors
    ///
    /// - [`StoreError::DuplicateProcessId`] if two entries share an id
    /// - [`StoreError::InvalidProcess`] if any entry has a negative id
    pub fn replace_all(&mut self, processes: Vec<Process>) -> StoreResult<()> {
        let mut seen = HashSet::with_capacity(processes.len());
        for process in &processes {
            validate_process(process)?;
            if !seen.insert(process.id()) {
                return Err(StoreError::DuplicateProcessId { id: process.id() });
            }
        }

        if !self.config.notify_unchanged && self.state.processes == processes {
            debug!(processes = processes.len(), "replacement left process list unchanged");
            return Ok(());
        }

        self.state = Arc::new(ProcessState { processes });
        self.commit("replace_all");
        Ok(())
    }

    /// The current process list, in display order.
    pub fn get_processes(&self) -> &[Process] {
        &self.state.processes
    }

    /// An immutable snapshot of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.state)
    }

    /// Look up a tracked process by id.
    pub fn get(&self, id: ProcessId) -> Option<&Process> {
        self.state.get(id)
    }

    pub fn contains(&self, id: ProcessId) -> bool {
        self.state.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Number of successful mutations since the store was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Register a callback notified after every successful mutation.
    ///
    /// Callbacks run in registration order on the thread performing the
    /// mutation.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) -> anyhow::Result<()> + Send + 'static,
    {
        self.subscribe_boxed(Box::new(callback))
    }

    /// Register an already boxed callback.
    pub fn subscribe_boxed(&mut self, callback: Callback) -> SubscriptionId {
        self.subscribers.add(callback)
    }

    /// Remove a subscriber.
    ///
    /// # Returns
    ///
    /// `true` if the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn commit(&mut self, operation: &'static str) {
        self.revision += 1;
        let failed_subscribers = self.subscribers.notify(&self.state);
        debug!(
            operation,
            revision = self.revision,
            processes = self.state.len(),
            failed_subscribers,
            "process store updated"
        );
    }
}

impl Default for ProcessStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProcessStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessStore")
            .field("state", &self.state)
            .field("revision", &self.revision)
            .field("config", &self.config)
            .field("subscribers", &self.subscribers)
            .finish()
    }
}

fn validate_process(process: &Process) -> StoreResult<()> {
    if process.id() < 0 {
        return Err(StoreError::InvalidProcess {
            id: process.id(),
            reason: "process id must not be negative".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording_store() -> (ProcessStore, Arc<Mutex<Vec<Snapshot>>>) {
        let mut store = ProcessStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |snapshot| {
            sink.lock().unwrap().push(Arc::clone(snapshot));
            Ok(())
        });
        (store, seen)
    }

    #[test]
    fn test_add_process_appends() {
        let mut store = ProcessStore::new();
        store.add_process(Process::new(1, "bash")).unwrap();
        store.add_process(Process::new(2, "vim")).unwrap();

        assert_eq!(
            store.get_processes(),
            &[Process::new(1, "bash"), Process::new(2, "vim")]
        );
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_add_process_upserts_in_place() {
        let mut store = ProcessStore::new();
        store.add_process(Process::new(1, "bash")).unwrap();
        store.add_process(Process::new(2, "vim")).unwrap();
        store.add_process(Process::new(1, "zsh")).unwrap();

        assert_eq!(
            store.get_processes(),
            &[Process::new(1, "zsh"), Process::new(2, "vim")]
        );
    }

    #[test]
    fn test_add_process_rejects_negative_id() {
        let (mut store, seen) = recording_store();
        store.add_process(Process::new(1, "bash")).unwrap();

        let err = store.add_process(Process::new(-4, "ghost")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidProcess { id: -4, .. }));

        assert_eq!(store.get_processes(), &[Process::new(1, "bash")]);
        assert_eq!(store.revision(), 1);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_missing_is_silent_noop() {
        let (mut store, seen) = recording_store();
        store.add_process(Process::new(2, "vim")).unwrap();
        let before = store.snapshot();

        assert!(!store.remove_process(99));
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.revision(), 1);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_replace_all_rejects_duplicates() {
        let mut store = ProcessStore::new();
        store.add_process(Process::new(1, "bash")).unwrap();
        let before = store.snapshot();

        let err = store
            .replace_all(vec![
                Process::new(3, "top"),
                Process::new(4, "htop"),
                Process::new(3, "top"),
            ])
            .unwrap_err();

        assert_eq!(err, StoreError::DuplicateProcessId { id: 3 });
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_replace_all_rejects_negative_id() {
        let mut store = ProcessStore::new();
        let err = store
            .replace_all(vec![Process::new(3, "top"), Process::new(-1, "bad")])
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidProcess { id: -1, .. }));
        assert!(store.is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_replace_all_with_empty_list_clears() {
        let (mut store, seen) = recording_store();
        store.add_process(Process::new(1, "bash")).unwrap();

        store.replace_all(Vec::new()).unwrap();
        assert!(store.is_empty());
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_snapshots_are_not_affected_by_later_mutations() {
        let mut store = ProcessStore::new();
        store.add_process(Process::new(1, "bash")).unwrap();
        let held = store.snapshot();

        store.add_process(Process::new(1, "zsh")).unwrap();
        store.remove_process(1);

        assert_eq!(held.processes, vec![Process::new(1, "bash")]);
        assert!(store.is_empty());
    }

    #[test]
    fn test_unchanged_upsert_notifies_by_default() {
        let (mut store, seen) = recording_store();
        store.add_process(Process::new(1, "bash")).unwrap();
        store.add_process(Process::new(1, "bash")).unwrap();

        assert_eq!(store.revision(), 2);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_unchanged_upsert_can_be_silenced() {
        let mut store = ProcessStore::with_config(StoreConfig {
            notify_unchanged: false,
        });
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        store.subscribe(move |_| {
            *sink.lock().unwrap() += 1;
            Ok(())
        });

        store.add_process(Process::new(1, "bash")).unwrap();
        store.add_process(Process::new(1, "bash")).unwrap();
        store.add_process(Process::new(1, "zsh")).unwrap();

        assert_eq!(store.revision(), 2);
        assert_eq!(*count.lock().unwrap(), 2);
    }

    #[test]
    fn test_failing_subscriber_does_not_block_others() {
        let mut store = ProcessStore::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        store.subscribe(move |_| {
            first.lock().unwrap().push("first");
            Ok(())
        });
        store.subscribe(|_| Err(anyhow::anyhow!("render failed")));
        let third = Arc::clone(&order);
        store.subscribe(move |_| {
            third.lock().unwrap().push("third");
            Ok(())
        });

        store.add_process(Process::new(1, "bash")).unwrap();

        assert_eq!(*order.lock().unwrap(), vec!["first", "third"]);
        assert_eq!(store.get_processes(), &[Process::new(1, "bash")]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let (mut store, seen) = recording_store();
        let extra = store.subscribe(|_| Ok(()));
        assert_eq!(store.subscriber_count(), 2);

        assert!(store.unsubscribe(extra));
        assert!(!store.unsubscribe(extra));
        assert_eq!(store.subscriber_count(), 1);

        store.add_process(Process::new(1, "bash")).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_panicking_subscriber_does_not_block_others() {
        let mut store = ProcessStore::new();
        store.subscribe(|_| panic!("subscriber blew up"));
        let hits = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&hits);
        store.subscribe(move |_| {
            *sink.lock().unwrap() += 1;
            Ok(())
        });

        store.add_process(Process::new(1, "bash")).unwrap();
        store.add_process(Process::new(2, "vim")).unwrap();

        assert_eq!(*hits.lock().unwrap(), 2);
        assert_eq!(store.revision(), 2);
        assert_eq!(
            store.get_processes(),
            &[Process::new(1, "bash"), Process::new(2, "vim")]
        );
    }

    #[test]
    fn test_unchanged_replace_can_be_silenced() {
        let mut store = ProcessStore::with_config(StoreConfig {
            notify_unchanged: false,
        });
        store
            .replace_all(vec![Process::new(1, "bash"), Process::new(2, "vim")])
            .unwrap();
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        store.subscribe(move |_| {
            *sink.lock().unwrap() += 1;
            Ok(())
        });

        store
            .replace_all(vec![Process::new(1, "bash"), Process::new(2, "vim")])
            .unwrap();
        assert_eq!(store.revision(), 1);
        assert_eq!(*count.lock().unwrap(), 0);

        // Same entries in a different order is a change.
        store
            .replace_all(vec![Process::new(2, "vim"), Process::new(1, "bash")])
            .unwrap();
        assert_eq!(store.revision(), 2);
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_unchanged_replace_notifies_by_default() {
        let (mut store, seen) = recording_store();
        store.replace_all(vec![Process::new(1, "bash")]).unwrap();
        store.replace_all(vec![Process::new(1, "bash")]).unwrap();

        assert_eq!(store.revision(), 2);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
