//! # SpliceHash - Zero-Copy File Digests via the Kernel Crypto API
//!
//! SpliceHash computes cryptographic digests of regular files without ever
//! staging the hashed bytes in a user-space buffer. On Linux it negotiates
//! an AF_ALG hashing session with the kernel crypto subsystem and drives a
//! splice(2) loop through a kernel pipe, so the data moves kernel-to-kernel
//! from the page cache straight into the hashing engine.
//!
//! ## Features
//!
//! - **Kernel-resident hashing**: any algorithm the kernel registers
//!   (`/proc/crypto`), not just what the binary links in
//! - **Zero-copy transfer**: splice(2) through a capacity-negotiated pipe
//! - **Strict accounting**: a digest is only emitted when every byte of the
//!   file's size at open time reached the session
//! - **Software fallback**: the same session contract over in-process
//!   hashers for hosts without AF_ALG
//!
//! ## Quick Start
//!
//! ```no_run
//! use splicehash::config::DigestConfig;
//! use splicehash::core::DigestEngine;
//! use std::path::PathBuf;
//!
//! let config = DigestConfig {
//!     algorithm: "sha256".to_string(),
//!     path: PathBuf::from("/etc/hostname"),
//!     ..Default::default()
//! };
//!
//! let outcome = DigestEngine::new(config).execute().unwrap();
//! println!("{}", outcome.format_line());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(target_os = "linux")]
pub mod conduit;
pub mod config;
pub mod core;
pub mod error;
pub mod session;

// Re-export commonly used types
pub use config::{Backend, DigestConfig};
pub use crate::core::{DigestEngine, DigestOutcome};
pub use error::{Result, SpliceHashError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use splicehash::prelude::*;
    //! ```

    pub use crate::config::{Backend, CliArgs, DigestConfig};
    pub use crate::core::{DigestEngine, DigestOutcome, DigestReport, TransferMethod};
    pub use crate::error::{Result, SpliceHashError};
    pub use crate::session::Session;
}
