//! Hashing session backends
//!
//! A session is a connection-like handle to a hashing engine bound to one
//! algorithm: input bytes are written in (with a "more data follows" hint),
//! and one finalized digest is read back. The kernel backend speaks the
//! AF_ALG socket protocol; the software backend provides the same contract
//! with in-process hashers for hosts without the kernel facility.

#[cfg(target_os = "linux")]
mod kernel;
mod registry;
mod software;

#[cfg(target_os = "linux")]
pub use kernel::KernelSession;
#[cfg(target_os = "linux")]
pub use registry::kernel_algorithms;
pub use registry::{parse_proc_crypto, SOFTWARE_ALGORITHMS};
pub use software::SoftwareSession;

use crate::config::Backend;
use crate::error::Result;

/// A hashing session bound to one algorithm
#[derive(Debug)]
pub enum Session {
    /// Kernel AF_ALG session
    #[cfg(target_os = "linux")]
    Kernel(KernelSession),
    /// In-process software session
    Software(SoftwareSession),
}

impl Session {
    /// Open a session for the given algorithm with the selected backend.
    ///
    /// `Auto` resolves to the kernel backend on Linux and the software
    /// backend elsewhere; a Linux kernel without AF_ALG surfaces
    /// `FacilityUnavailable` rather than silently degrading, since that is
    /// a fixable system configuration.
    pub fn open(algorithm: &str, backend: Backend) -> Result<Self> {
        match backend {
            Backend::Auto => {
                #[cfg(target_os = "linux")]
                {
                    KernelSession::open(algorithm).map(Session::Kernel)
                }
                #[cfg(not(target_os = "linux"))]
                {
                    SoftwareSession::open(algorithm).map(Session::Software)
                }
            }
            Backend::Kernel => {
                #[cfg(target_os = "linux")]
                {
                    KernelSession::open(algorithm).map(Session::Kernel)
                }
                #[cfg(not(target_os = "linux"))]
                {
                    Err(crate::error::SpliceHashError::FacilityUnavailable)
                }
            }
            Backend::Software => SoftwareSession::open(algorithm).map(Session::Software),
        }
    }

    /// Name of the algorithm this session is bound to
    pub fn algorithm(&self) -> &str {
        match self {
            #[cfg(target_os = "linux")]
            Session::Kernel(session) => session.algorithm(),
            Session::Software(session) => session.algorithm(),
        }
    }

    /// Feed input bytes into the session.
    ///
    /// `more_follows` tells the engine not to finalize yet; the digest is
    /// finalized by the subsequent read.
    pub fn write_update(&mut self, data: &[u8], more_follows: bool) -> Result<()> {
        match self {
            #[cfg(target_os = "linux")]
            Session::Kernel(session) => session.write_update(data, more_follows),
            Session::Software(session) => session.write_update(data, more_follows),
        }
    }

    /// Read the finalized digest back from the session
    pub fn read_digest(&mut self) -> Result<Vec<u8>> {
        match self {
            #[cfg(target_os = "linux")]
            Session::Kernel(session) => session.read_digest(),
            Session::Software(session) => session.read_digest(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_software_backend_always_opens() {
        let session = Session::open("sha256", Backend::Software).unwrap();
        assert_eq!(session.algorithm(), "sha256");
    }

    #[test]
    fn test_software_backend_rejects_unknown() {
        let err = Session::open("not-a-real-hash", Backend::Software).unwrap_err();
        assert!(matches!(
            err,
            crate::error::SpliceHashError::AlgorithmNotFound { .. }
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_kernel_backend_or_facility_error() {
        match Session::open("sha256", Backend::Kernel) {
            Ok(session) => assert_eq!(session.algorithm(), "sha256"),
            Err(crate::error::SpliceHashError::FacilityUnavailable) => (),
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
}
