//! Configuration loading.
//!
//! This module loads store and bus settings from the `.miru/` directory.

pub mod error;
pub mod loader;
