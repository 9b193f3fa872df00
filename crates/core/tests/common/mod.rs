//! Common test utilities shared by the integration tests.
//!
//! This module provides:
//! - Wire frame builders
//! - Recording subscribers

pub mod fixtures;

pub use fixtures::*;
