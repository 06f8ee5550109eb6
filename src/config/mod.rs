//! Configuration module for SpliceHash
//!
//! Provides configuration management including CLI arguments,
//! runtime settings, and process-wide defaults.

mod settings;

pub use settings::*;
