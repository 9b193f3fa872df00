//! Process bus synchronization.
//!
//! This module provides:
//! - [`BusPlugin`], the stateless translator from bus events to store mutations
//! - [`runtime`], a single owning task that serializes delivery onto the store

pub mod error;
pub mod plugin;
pub mod runtime;

pub use error::{BusError, BusResult};
pub use plugin::{decode_event, BusPlugin, Delivery};
pub use runtime::{pump, spawn_store, StoreHandle};
