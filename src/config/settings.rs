//! Configuration settings for SpliceHash
//!
//! Defines all configuration options, CLI arguments, and defaults
//! for the digest pipeline.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default requested capacity for the splice pipe (1 MiB)
pub const DEFAULT_CONDUIT_CAPACITY: usize = 1024 * 1024;

/// Upper bound on a single digest read; larger than any practical digest
pub const MAX_DIGEST_SIZE: usize = 256;

/// Capacity of the kernel's algorithm name field, NUL terminator included
pub const ALG_NAME_CAPACITY: usize = 64;

/// SpliceHash - zero-copy file digests via the kernel crypto API
#[derive(Parser, Debug, Clone)]
#[command(name = "splicehash")]
#[command(author = "SpliceHash Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Zero-copy file digests via the kernel crypto API")]
#[command(long_about = r#"
SpliceHash computes file digests by streaming file contents into the Linux
kernel's crypto subsystem (AF_ALG) with splice(2), so the hashed bytes never
pass through a user-space buffer. On hosts without AF_ALG an in-process
software backend provides the same contract.

Examples:
  splicehash sha256 /path/to/file             # Kernel-backed digest
  splicehash sha512 big.iso --pipe-size 4M    # Larger splice pipe
  splicehash sha256 file --backend software   # In-process hashing
  splicehash algorithms                       # List kernel hash algorithms
"#)]
pub struct CliArgs {
    /// Hash algorithm name as registered with the kernel (e.g. sha256)
    #[arg(value_name = "ALGORITHM")]
    pub algorithm: Option<String>,

    /// Input file path (must be a regular file)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Hashing backend selection
    #[arg(long, value_enum, default_value = "auto", value_name = "BACKEND")]
    pub backend: Backend,

    /// Requested splice pipe capacity (e.g. 1M, 64K)
    #[arg(long, default_value = "1M", value_name = "SIZE")]
    pub pipe_size: String,

    /// Print the outcome as JSON instead of the digest line
    #[arg(long)]
    pub json: bool,

    /// Print only the hex digest, nothing else
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run instead of hashing a file
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List hash algorithms registered with the kernel
    #[command(name = "algorithms")]
    Algorithms {
        /// Include algorithms the kernel marks internal-only
        #[arg(long)]
        all: bool,
    },
}

/// Hashing backend
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Kernel AF_ALG on Linux, software elsewhere
    #[default]
    Auto,
    /// Kernel AF_ALG only; fail if the facility is unavailable
    Kernel,
    /// In-process hashing, no kernel involvement
    Software,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Algorithm name passed to the hashing backend
    pub algorithm: String,
    /// Input file path
    pub path: PathBuf,
    /// Requested splice pipe capacity; also the buffered chunk size
    pub conduit_capacity: usize,
    /// Backend selection
    pub backend: Backend,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            algorithm: String::new(),
            path: PathBuf::new(),
            conduit_capacity: DEFAULT_CONDUIT_CAPACITY,
            backend: Backend::Auto,
        }
    }
}

impl DigestConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        let algorithm = args.algorithm.as_ref().ok_or("Algorithm name required")?;
        let path = args.file.as_ref().ok_or("Input file required")?;

        let capacity =
            parse_size(&args.pipe_size).map_err(|e| format!("Invalid pipe size: {}", e))?;
        if capacity == 0 {
            return Err("Pipe size must be nonzero".to_string());
        }
        if capacity > i32::MAX as u64 {
            return Err(format!(
                "Pipe size {} exceeds what a pipe can be sized to",
                args.pipe_size
            ));
        }

        Ok(Self {
            algorithm: algorithm.clone(),
            path: path.clone(),
            conduit_capacity: capacity as usize,
            backend: args.backend,
        })
    }
}

/// Parse human-readable size string to bytes
pub fn parse_size(size: &str) -> Result<u64, String> {
    let size = size.trim().to_uppercase();

    if size.is_empty() {
        return Err("Empty size string".to_string());
    }

    let (num_str, multiplier) = if size.ends_with("GB") || size.ends_with('G') {
        let num = size.trim_end_matches(|c| c == 'G' || c == 'B');
        (num.to_string(), 1024u64 * 1024 * 1024)
    } else if size.ends_with("MB") || size.ends_with('M') {
        let num = size.trim_end_matches(|c| c == 'M' || c == 'B');
        (num.to_string(), 1024u64 * 1024)
    } else if size.ends_with("KB") || size.ends_with('K') {
        let num = size.trim_end_matches(|c| c == 'K' || c == 'B');
        (num.to_string(), 1024u64)
    } else if size.ends_with('B') {
        (size.trim_end_matches('B').to_string(), 1u64)
    } else {
        (size, 1u64)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {}", num_str))?;

    Ok((num * multiplier as f64) as u64)
}
