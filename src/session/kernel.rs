//! Kernel AF_ALG hashing sessions
//!
//! Negotiates a session with the kernel crypto subsystem: a SOCK_SEQPACKET
//! socket in the AF_ALG family is bound to a `"hash"` transform by
//! algorithm name, and accept() derives the per-session operation
//! descriptor that input is written to and the digest is read from. Both
//! descriptors stay open for the lifetime of the transfer.

use crate::config::{ALG_NAME_CAPACITY, MAX_DIGEST_SIZE};
use crate::error::{Result, SpliceHashError};
use std::io;
use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, FromRawFd, OwnedFd};

/// AF_ALG socket type for hash transforms
const HASH_TYPE: &[u8] = b"hash";

/// A hashing session backed by the kernel crypto API
#[derive(Debug)]
pub struct KernelSession {
    /// Bound transform socket; must outlive the operation descriptor
    _tfm: OwnedFd,
    /// Per-session operation descriptor
    op: OwnedFd,
    algorithm: String,
}

impl KernelSession {
    /// Open a kernel hashing session for the named algorithm.
    ///
    /// The name is validated against the kernel's fixed-size field before
    /// any kernel interaction. `EAFNOSUPPORT` on socket creation and
    /// `ENOENT` on bind are mapped to their distinct, user-actionable
    /// error categories.
    pub fn open(algorithm: &str) -> Result<Self> {
        if algorithm.is_empty() {
            return Err(SpliceHashError::config("algorithm name must not be empty"));
        }
        if algorithm.len() + 1 > ALG_NAME_CAPACITY {
            return Err(SpliceHashError::AlgorithmNameTooLong {
                name: algorithm.to_string(),
                len: algorithm.len(),
                max: ALG_NAME_CAPACITY,
            });
        }

        let raw = unsafe { libc::socket(libc::AF_ALG, libc::SOCK_SEQPACKET, 0) };
        if raw < 0 {
            let err = io::Error::last_os_error();
            return Err(if err.raw_os_error() == Some(libc::EAFNOSUPPORT) {
                SpliceHashError::FacilityUnavailable
            } else {
                SpliceHashError::session("socket", err)
            });
        }
        let tfm = unsafe { OwnedFd::from_raw_fd(raw) };

        let mut addr: libc::sockaddr_alg = unsafe { std::mem::zeroed() };
        addr.salg_family = libc::AF_ALG as libc::sa_family_t;
        addr.salg_type[..HASH_TYPE.len()].copy_from_slice(HASH_TYPE);
        addr.salg_name[..algorithm.len()].copy_from_slice(algorithm.as_bytes());

        let rc = unsafe {
            libc::bind(
                tfm.as_raw_fd(),
                &addr as *const libc::sockaddr_alg as *const libc::sockaddr,
                std::mem::size_of::<libc::sockaddr_alg>() as libc::socklen_t,
            )
        };
        if rc < 0 {
            let err = io::Error::last_os_error();
            return Err(if err.raw_os_error() == Some(libc::ENOENT) {
                SpliceHashError::AlgorithmNotFound {
                    name: algorithm.to_string(),
                }
            } else {
                SpliceHashError::session(format!("bind({})", algorithm), err)
            });
        }

        let raw_op =
            unsafe { libc::accept(tfm.as_raw_fd(), std::ptr::null_mut(), std::ptr::null_mut()) };
        if raw_op < 0 {
            return Err(SpliceHashError::session(
                "accept",
                io::Error::last_os_error(),
            ));
        }
        let op = unsafe { OwnedFd::from_raw_fd(raw_op) };

        Ok(Self {
            _tfm: tfm,
            op,
            algorithm: algorithm.to_string(),
        })
    }

    /// Name of the algorithm this session is bound to
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Operation descriptor, usable as a splice target
    pub fn op_fd(&self) -> BorrowedFd<'_> {
        self.op.as_fd()
    }

    /// Write input bytes through the socket with send(2).
    ///
    /// `more_follows` maps to MSG_MORE, which tells the kernel to keep the
    /// transform open for further input instead of finalizing.
    pub fn write_update(&mut self, data: &[u8], more_follows: bool) -> Result<()> {
        let flags = if more_follows { libc::MSG_MORE } else { 0 };
        let mut sent = 0;

        while sent < data.len() {
            let n = unsafe {
                libc::send(
                    self.op.as_raw_fd(),
                    data[sent..].as_ptr() as *const libc::c_void,
                    data.len() - sent,
                    flags,
                )
            };
            if n <= 0 {
                return Err(SpliceHashError::session(
                    "send",
                    io::Error::last_os_error(),
                ));
            }
            sent += n as usize;
        }

        Ok(())
    }

    /// Read the finalized digest.
    ///
    /// A recv with no further writes finalizes the transform; the number of
    /// bytes received is the digest length.
    pub fn read_digest(&mut self) -> Result<Vec<u8>> {
        let mut buf = [0u8; MAX_DIGEST_SIZE];

        let got = unsafe {
            libc::recv(
                self.op.as_raw_fd(),
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
                0,
            )
        };
        if got < 0 {
            return Err(SpliceHashError::SessionRead {
                source: io::Error::last_os_error(),
            });
        }

        Ok(buf[..got as usize].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA256_ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
    const SHA256_EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    /// Open a session, or skip the test on kernels without AF_ALG
    fn open_or_skip(algorithm: &str) -> Option<KernelSession> {
        match KernelSession::open(algorithm) {
            Ok(session) => Some(session),
            Err(SpliceHashError::FacilityUnavailable) => None,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn test_sha256_abc() {
        let Some(mut session) = open_or_skip("sha256") else {
            return;
        };
        session.write_update(b"abc", true).unwrap();
        let digest = session.read_digest().unwrap();
        assert_eq!(hex::encode(digest), SHA256_ABC);
    }

    #[test]
    fn test_digest_of_empty_input() {
        let Some(mut session) = open_or_skip("sha256") else {
            return;
        };
        let digest = session.read_digest().unwrap();
        assert_eq!(hex::encode(digest), SHA256_EMPTY);
    }

    #[test]
    fn test_unknown_algorithm() {
        match KernelSession::open("not-a-real-hash") {
            Err(SpliceHashError::AlgorithmNotFound { name }) => {
                assert_eq!(name, "not-a-real-hash");
            }
            Err(SpliceHashError::FacilityUnavailable) => (),
            other => panic!("expected AlgorithmNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_name_too_long_rejected_before_kernel() {
        let name = "x".repeat(ALG_NAME_CAPACITY);
        match KernelSession::open(&name) {
            Err(SpliceHashError::AlgorithmNameTooLong { len, max, .. }) => {
                assert_eq!(len, ALG_NAME_CAPACITY);
                assert_eq!(max, ALG_NAME_CAPACITY);
            }
            other => panic!("expected AlgorithmNameTooLong, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            KernelSession::open(""),
            Err(SpliceHashError::Config(_))
        ));
    }
}
