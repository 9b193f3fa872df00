//! Observer list for store snapshots.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::warn;

use crate::store::container::Snapshot;

/// Callback invoked with the new snapshot after every successful mutation.
///
/// Returning an error or panicking only affects logging; the remaining
/// subscribers are still notified.
pub type Callback = Box<dyn FnMut(&Snapshot) -> anyhow::Result<()> + Send>;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Registered callbacks, kept in registration order.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Invoke every callback with `snapshot`.
    ///
    /// A callback that panics is treated like one that returned an error.
    ///
    /// Returns the number of callbacks that failed.
    pub(crate) fn notify(&mut self, snapshot: &Snapshot) -> usize {
        let mut failures = 0;
        for (id, callback) in &mut self.entries {
            match catch_unwind(AssertUnwindSafe(|| callback(snapshot))) {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    failures += 1;
                    warn!(subscriber = %id, error = %error, "process store subscriber failed");
                }
                Err(payload) => {
                    failures += 1;
                    warn!(
                        subscriber = %id,
                        panic = panic_message(payload.as_ref()),
                        "process store subscriber panicked"
                    );
                }
            }
        }
        failures
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}
