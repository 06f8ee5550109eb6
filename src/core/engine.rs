//! Digest engine: transfer loop and digest retrieval
//!
//! The loop accounts for every byte against the file size taken at open
//! time. `remaining` is decremented by the session-side amount of each
//! iteration, since that is what actually reached the hashing engine; any
//! unexpected byte count on either leg aborts the run. A digest is only
//! ever produced for a complete transfer.

#[cfg(target_os = "linux")]
use crate::conduit::Conduit;
use crate::config::DigestConfig;
use crate::error::{IoResultExt, Result, SpliceHashError};
#[cfg(target_os = "linux")]
use crate::session::KernelSession;
use crate::session::{Session, SoftwareSession};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How the file bytes reached the hashing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMethod {
    /// Zero-copy splice through a kernel pipe
    Spliced,
    /// Buffered read/write loop (software backend)
    Buffered,
}

impl std::fmt::Display for TransferMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spliced => write!(f, "spliced"),
            Self::Buffered => write!(f, "buffered"),
        }
    }
}

/// Result of a completed digest run
#[derive(Debug, Clone)]
pub struct DigestOutcome {
    /// Algorithm the digest was computed with
    pub algorithm: String,
    /// Input file path
    pub path: PathBuf,
    /// Raw digest bytes; length is algorithm-defined
    pub digest: Vec<u8>,
    /// Bytes moved into the hashing session
    pub bytes_hashed: u64,
    /// Negotiated chunk capacity the transfer ran with
    pub chunk_capacity: usize,
    /// Transfer method used
    pub method: TransferMethod,
    /// Wall-clock duration of the run
    pub duration: Duration,
    /// Throughput in bytes/second
    pub throughput: f64,
}

impl DigestOutcome {
    /// Digest as a lowercase hex string, no separators
    pub fn hex(&self) -> String {
        hex::encode(&self.digest)
    }

    /// The canonical one-line output form
    pub fn format_line(&self) -> String {
        format!(
            "Spliced {}({}): {}",
            self.algorithm,
            self.path.display(),
            self.hex()
        )
    }

    /// Print a verbose summary to console
    pub fn print_summary(&self) {
        println!("\n=== Digest Summary ===");
        println!("Algorithm:   {}", self.algorithm);
        println!("Input:       {}", self.path.display());
        println!(
            "Bytes:       {}",
            humansize::format_size(self.bytes_hashed, humansize::BINARY)
        );
        println!("Method:      {}", self.method);
        println!(
            "Chunk size:  {}",
            humansize::format_size(self.chunk_capacity as u64, humansize::BINARY)
        );
        println!("Duration:    {:.2?}", self.duration);
        println!(
            "Throughput:  {}/s",
            humansize::format_size(self.throughput as u64, humansize::BINARY)
        );
    }

    /// Build the serializable report for machine consumers
    pub fn report(&self) -> DigestReport {
        DigestReport {
            algorithm: self.algorithm.clone(),
            path: self.path.display().to_string(),
            digest: self.hex(),
            bytes_hashed: self.bytes_hashed,
            method: self.method,
            duration_ms: self.duration.as_millis() as u64,
        }
    }

    fn calculate_throughput(&mut self) {
        if self.duration.as_secs_f64() > 0.0 {
            self.throughput = self.bytes_hashed as f64 / self.duration.as_secs_f64();
        }
    }
}

/// Machine-readable digest report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestReport {
    /// Algorithm the digest was computed with
    pub algorithm: String,
    /// Input file path
    pub path: String,
    /// Digest as lowercase hex
    pub digest: String,
    /// Bytes moved into the hashing session
    pub bytes_hashed: u64,
    /// Transfer method used
    pub method: TransferMethod,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

/// Main digest engine
pub struct DigestEngine {
    config: DigestConfig,
}

impl DigestEngine {
    /// Create a new digest engine
    pub fn new(config: DigestConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline and return the outcome
    pub fn execute(&self) -> Result<DigestOutcome> {
        let start = Instant::now();

        let (file, size) = self.open_input()?;
        let mut session = Session::open(&self.config.algorithm, self.config.backend)?;

        let (bytes_hashed, method, chunk_capacity) = self.transfer(&file, size, &mut session)?;
        if bytes_hashed != size {
            return Err(SpliceHashError::TransferIntegrity {
                stage: "total accounting",
                expected: size,
                actual: bytes_hashed,
            });
        }

        let digest = session.read_digest()?;

        let mut outcome = DigestOutcome {
            algorithm: self.config.algorithm.clone(),
            path: self.config.path.clone(),
            digest,
            bytes_hashed,
            chunk_capacity,
            method,
            duration: start.elapsed(),
            throughput: 0.0,
        };
        outcome.calculate_throughput();

        Ok(outcome)
    }

    /// Open the input and take its size from fstat.
    ///
    /// Anything but a regular file is rejected here, before any session
    /// negotiation: the transfer loop needs a size known up front.
    fn open_input(&self) -> Result<(File, u64)> {
        let path = &self.config.path;
        let file = File::open(path).with_path(path)?;
        let metadata = file.metadata().with_path(path)?;

        if !metadata.is_file() {
            return Err(SpliceHashError::NotARegularFile {
                path: path.clone(),
                file_type: describe_file_type(metadata.file_type()),
            });
        }

        Ok((file, metadata.len()))
    }

    fn transfer(
        &self,
        file: &File,
        size: u64,
        session: &mut Session,
    ) -> Result<(u64, TransferMethod, usize)> {
        match session {
            #[cfg(target_os = "linux")]
            Session::Kernel(kernel) => {
                let conduit = Conduit::with_capacity(self.config.conduit_capacity)?;
                let chunk_capacity = conduit.capacity();
                let moved = splice_transfer(file, size, &conduit, kernel)?;
                Ok((moved, TransferMethod::Spliced, chunk_capacity))
            }
            Session::Software(software) => {
                let moved =
                    buffered_transfer(file, size, software, self.config.conduit_capacity)?;
                Ok((moved, TransferMethod::Buffered, self.config.conduit_capacity))
            }
        }
    }
}

/// Move `size` bytes from the file into the kernel session, zero-copy.
///
/// Each iteration splices up to one conduit capacity from the file into
/// the pipe, then the same amount from the pipe into the session with
/// SPLICE_F_MORE set. The file-side leg may come up short (that amount
/// becomes authoritative); the session-side leg may not, since the pipe
/// guarantees the bytes are immediately available.
#[cfg(target_os = "linux")]
fn splice_transfer(
    file: &File,
    size: u64,
    conduit: &Conduit,
    session: &KernelSession,
) -> Result<u64> {
    use std::os::unix::io::AsRawFd;

    let mut remaining = size;
    while remaining > 0 {
        let chunk = remaining.min(conduit.capacity() as u64) as usize;

        let pulled = unsafe {
            libc::splice(
                file.as_raw_fd(),
                std::ptr::null_mut(),
                conduit.write_end().as_raw_fd(),
                std::ptr::null_mut(),
                chunk,
                0,
            )
        };
        if pulled < 0 {
            return Err(SpliceHashError::transfer_failed(
                "file to pipe",
                std::io::Error::last_os_error(),
            ));
        }
        if pulled == 0 || pulled as usize > chunk {
            return Err(SpliceHashError::TransferIntegrity {
                stage: "file to pipe",
                expected: chunk as u64,
                actual: pulled as u64,
            });
        }

        let sent = unsafe {
            libc::splice(
                conduit.read_end().as_raw_fd(),
                std::ptr::null_mut(),
                session.op_fd().as_raw_fd(),
                std::ptr::null_mut(),
                pulled as usize,
                libc::SPLICE_F_MORE,
            )
        };
        if sent < 0 {
            return Err(SpliceHashError::transfer_failed(
                "pipe to session",
                std::io::Error::last_os_error(),
            ));
        }
        if sent != pulled {
            return Err(SpliceHashError::TransferIntegrity {
                stage: "pipe to session",
                expected: pulled as u64,
                actual: sent as u64,
            });
        }

        tracing::debug!(moved = sent, remaining, "splice iteration");
        remaining -= sent as u64;
    }

    Ok(size - remaining)
}

/// Buffered equivalent of the splice loop, same accounting contract:
/// nonzero bounded reads, full writes, `remaining` closed to exactly zero.
fn buffered_transfer(
    file: &File,
    size: u64,
    session: &mut SoftwareSession,
    chunk_capacity: usize,
) -> Result<u64> {
    if size == 0 {
        return Ok(0);
    }

    let mut reader = file;
    let mut buffer = vec![0u8; chunk_capacity];
    let mut remaining = size;

    while remaining > 0 {
        let chunk = remaining.min(chunk_capacity as u64) as usize;

        let read = reader
            .read(&mut buffer[..chunk])
            .map_err(|e| SpliceHashError::transfer_failed("file read", e))?;
        if read == 0 || read > chunk {
            return Err(SpliceHashError::TransferIntegrity {
                stage: "file read",
                expected: chunk as u64,
                actual: read as u64,
            });
        }

        session.write_update(&buffer[..read], true)?;
        remaining -= read as u64;
    }

    Ok(size - remaining)
}

fn describe_file_type(file_type: std::fs::FileType) -> &'static str {
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if file_type.is_fifo() {
            return "named pipe";
        }
        if file_type.is_socket() {
            return "socket";
        }
        if file_type.is_block_device() {
            return "block device";
        }
        if file_type.is_char_device() {
            return "character device";
        }
    }
    if file_type.is_dir() {
        "directory"
    } else {
        "special file"
    }
}
