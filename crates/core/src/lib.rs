//! # miru-core
//!
//! Process-list state container for the miru management UI.
//!
//! This crate provides:
//! - A store owning the list of running processes, with subscriptions
//! - A bus plugin translating backend events into store mutations
//! - An owning task that serializes bus delivery for multi-threaded hosts
//! - Configuration loading from the `.miru/` directory
//!
//! ## Modules
//!
//! - [`store`]: The process store and its subscribers
//! - [`bus`]: Event translation and the owning task
//! - [`config`]: Configuration loading and errors
//!
//! ## Example
//!
//! ```rust
//! use miru_core::bus::BusPlugin;
//! use miru_core::store::ProcessStore;
//! use miru_protocol::Process;
//!
//! let mut store = ProcessStore::new();
//! store.subscribe(|snapshot| {
//!     println!("{} processes", snapshot.processes.len());
//!     Ok(())
//! });
//!
//! let plugin = BusPlugin::new();
//! plugin.handle_frame(
//!     &mut store,
//!     r#"{"type":"processStarted","payload":{"id":1,"name":"bash"}}"#,
//! );
//! assert_eq!(store.get_processes(), &[Process::new(1, "bash")]);
//! ```

pub mod bus;
pub mod config;
pub mod store;
