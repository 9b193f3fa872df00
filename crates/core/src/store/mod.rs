//! Process-list state container.
//!
//! This module provides:
//! - [`ProcessStore`], the single owner of the tracked process list
//! - The subscriber list notified after every successful mutation
//! - [`StoreError`] for rejected mutations

pub mod container;
pub mod error;
pub mod subscribers;

pub use container::{ProcessStore, Snapshot};
pub use error::{StoreError, StoreResult};
pub use subscribers::{Callback, SubscriptionId};
