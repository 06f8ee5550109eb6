//! Zero-copy conduit module
//!
//! A file descriptor cannot be spliced directly into an AF_ALG socket;
//! the transfer has to stage through a pipe. This module owns that pipe
//! and its capacity negotiation.

mod pipe;

pub use pipe::*;
