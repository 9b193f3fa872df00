//! # miru-protocol
//!
//! Shared data models for the miru process store.
//!
//! This crate defines the structures exchanged between the live backend,
//! the store and the browser UI:
//! - The tracked process list and its snapshots
//! - Events delivered over the process bus
//! - Store and bus settings from `.miru/config.toml`
//!
//! ## Modules
//!
//! - [`process_models`]: `Process` and `ProcessState`
//! - [`ipc`]: Events consumed by the bus plugin
//! - [`config_models`]: Settings for the store and its owning task
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde and ts-rs
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other miru crates

pub mod config_models;
pub mod ipc;
pub mod process_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use ipc::*;
pub use process_models::*;
