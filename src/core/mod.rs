//! Core digest engine module
//!
//! Drives the whole pipeline: open and validate the input, negotiate a
//! hashing session, move every byte through the conduit, and retrieve
//! the digest.

mod engine;

pub use engine::*;
