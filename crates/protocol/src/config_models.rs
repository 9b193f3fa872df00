//! Settings models for `.miru/config.toml`.
//!
//! This module defines the structure of the configuration file that tunes
//! the process store and the task that owns it.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

/// Default capacity of the channel feeding the store's owning task.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Represents all settings from `.miru/config.toml`.
///
/// # Example
///
/// ```toml
/// # .miru/config.toml
/// [store]
/// notify_unchanged = false
///
/// [bus]
/// channel_capacity = 128
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
pub struct GlobalConfig {
    /// Process store behaviour.
    #[serde(default)]
    pub store: StoreConfig,

    /// Bus plugin and owning task settings.
    #[serde(default)]
    pub bus: BusConfig,
}

/// Settings for the process store itself.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
pub struct StoreConfig {
    /// Notify subscribers when a mutation leaves the state unchanged.
    ///
    /// Covers an upsert that re-sends an identical entry and a replace-all
    /// with an identical list. Both still succeed; with this disabled they
    /// neither bump the revision nor wake subscribers.
    #[serde(default = "default_notify_unchanged")]
    pub notify_unchanged: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            notify_unchanged: default_notify_unchanged(),
        }
    }
}

/// Settings for the bus plugin's owning task.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
pub struct BusConfig {
    /// Capacity of the bounded channel that marshals frames onto the task.
    ///
    /// Must be greater than zero.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_notify_unchanged() -> bool {
    true
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}
