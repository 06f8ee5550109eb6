//! Splice pipe with capacity negotiation
//!
//! Creation failure is fatal; failure to grow the pipe is not. A pipe
//! stuck at the kernel default just means more transfer iterations, so
//! the sizer logs a warning and carries on with whatever capacity the
//! pipe actually has.

use crate::error::{Result, SpliceHashError};
use std::io;
use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, FromRawFd, OwnedFd};

/// Kernel default pipe capacity, assumed when F_GETPIPE_SZ fails
const DEFAULT_PIPE_CAPACITY: usize = 64 * 1024;

/// A unidirectional kernel pipe used as the splice intermediary
pub struct Conduit {
    read: OwnedFd,
    write: OwnedFd,
    capacity: usize,
}

impl Conduit {
    /// Create a pipe and try to size both ends to `requested` bytes.
    ///
    /// The negotiated capacity (which may be the default if sizing failed,
    /// or a rounded-up value chosen by the kernel) becomes the transfer
    /// loop's maximum chunk size.
    pub fn with_capacity(requested: usize) -> Result<Self> {
        let mut fds = [0 as libc::c_int; 2];
        if unsafe { libc::pipe(fds.as_mut_ptr()) } < 0 {
            return Err(SpliceHashError::Conduit {
                source: io::Error::last_os_error(),
            });
        }
        let read = unsafe { OwnedFd::from_raw_fd(fds[0]) };
        let write = unsafe { OwnedFd::from_raw_fd(fds[1]) };

        let mut sized = true;
        for fd in [&read, &write] {
            let rc = unsafe {
                libc::fcntl(fd.as_raw_fd(), libc::F_SETPIPE_SZ, requested as libc::c_int)
            };
            if rc < 0 {
                sized = false;
            }
        }
        if !sized {
            tracing::warn!(
                requested,
                "F_SETPIPE_SZ failed, using default pipe capacity; \
                 check /proc/sys/fs/pipe-max-size"
            );
        }

        let capacity = match unsafe { libc::fcntl(read.as_raw_fd(), libc::F_GETPIPE_SZ) } {
            n if n > 0 => n as usize,
            _ => DEFAULT_PIPE_CAPACITY,
        };

        Ok(Self {
            read,
            write,
            capacity,
        })
    }

    /// Negotiated pipe capacity in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Read end, the splice source towards the session
    pub fn read_end(&self) -> BorrowedFd<'_> {
        self.read.as_fd()
    }

    /// Write end, the splice target from the input file
    pub fn write_end(&self) -> BorrowedFd<'_> {
        self.write.as_fd()
    }
}
