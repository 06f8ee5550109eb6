//! In-process software hashing sessions
//!
//! Mirrors the kernel session contract with library hashers, for hosts
//! without AF_ALG and for explicit opt-in via `--backend software`. The
//! transfer runs through a buffered loop instead of splice; that is a
//! throughput difference, not a correctness one.

use crate::error::{Result, SpliceHashError};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

/// A hashing session backed by in-process hashers
#[derive(Debug)]
pub struct SoftwareSession {
    algorithm: String,
    hasher: SoftwareHasher,
}

/// Unified hasher over the supported software algorithms
#[derive(Debug)]
enum SoftwareHasher {
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Blake3(Box<blake3::Hasher>),
}

impl SoftwareSession {
    /// Open a software session for the named algorithm.
    ///
    /// Unknown names fail with the same `AlgorithmNotFound` category the
    /// kernel backend reports for an unregistered transform.
    pub fn open(algorithm: &str) -> Result<Self> {
        let hasher = match algorithm {
            "sha224" => SoftwareHasher::Sha224(Sha224::new()),
            "sha256" => SoftwareHasher::Sha256(Sha256::new()),
            "sha384" => SoftwareHasher::Sha384(Sha384::new()),
            "sha512" => SoftwareHasher::Sha512(Sha512::new()),
            "blake3" => SoftwareHasher::Blake3(Box::new(blake3::Hasher::new())),
            _ => {
                return Err(SpliceHashError::AlgorithmNotFound {
                    name: algorithm.to_string(),
                })
            }
        };

        Ok(Self {
            algorithm: algorithm.to_string(),
            hasher,
        })
    }

    /// Name of the algorithm this session is bound to
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Feed input bytes into the hasher; finalization happens at read time
    pub fn write_update(&mut self, data: &[u8], _more_follows: bool) -> Result<()> {
        match &mut self.hasher {
            SoftwareHasher::Sha224(h) => h.update(data),
            SoftwareHasher::Sha256(h) => h.update(data),
            SoftwareHasher::Sha384(h) => h.update(data),
            SoftwareHasher::Sha512(h) => h.update(data),
            SoftwareHasher::Blake3(h) => {
                h.update(data);
            }
        }
        Ok(())
    }

    /// Finalize and return the digest bytes
    pub fn read_digest(&mut self) -> Result<Vec<u8>> {
        let digest = match &mut self.hasher {
            SoftwareHasher::Sha224(h) => h.finalize_reset().to_vec(),
            SoftwareHasher::Sha256(h) => h.finalize_reset().to_vec(),
            SoftwareHasher::Sha384(h) => h.finalize_reset().to_vec(),
            SoftwareHasher::Sha512(h) => h.finalize_reset().to_vec(),
            SoftwareHasher::Blake3(h) => {
                let out = h.finalize().as_bytes().to_vec();
                h.reset();
                out
            }
        };
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA256_ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
    const SHA256_EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const BLAKE3_ABC: &str = "6437b3ac38465133ffb63b75273a8db548c558465d79db03fd359c6cd5bd9d85";

    #[test]
    fn test_sha256_abc() {
        let mut session = SoftwareSession::open("sha256").unwrap();
        session.write_update(b"abc", true).unwrap();
        assert_eq!(hex::encode(session.read_digest().unwrap()), SHA256_ABC);
    }

    #[test]
    fn test_sha256_empty_input() {
        let mut session = SoftwareSession::open("sha256").unwrap();
        assert_eq!(hex::encode(session.read_digest().unwrap()), SHA256_EMPTY);
    }

    #[test]
    fn test_blake3_abc() {
        let mut session = SoftwareSession::open("blake3").unwrap();
        session.write_update(b"abc", true).unwrap();
        assert_eq!(hex::encode(session.read_digest().unwrap()), BLAKE3_ABC);
    }

    #[test]
    fn test_chunked_updates_match_single_write() {
        let mut chunked = SoftwareSession::open("sha512").unwrap();
        chunked.write_update(b"hello, ", true).unwrap();
        chunked.write_update(b"world", true).unwrap();

        let mut whole = SoftwareSession::open("sha512").unwrap();
        whole.write_update(b"hello, world", true).unwrap();

        assert_eq!(
            chunked.read_digest().unwrap(),
            whole.read_digest().unwrap()
        );
    }

    #[test]
    fn test_digest_lengths() {
        for (name, len) in [("sha224", 28), ("sha256", 32), ("sha384", 48), ("sha512", 64)] {
            let mut session = SoftwareSession::open(name).unwrap();
            session.write_update(b"abc", true).unwrap();
            assert_eq!(session.read_digest().unwrap().len(), len);
        }
    }

    #[test]
    fn test_unknown_algorithm() {
        assert!(matches!(
            SoftwareSession::open("md5-but-wrong"),
            Err(SpliceHashError::AlgorithmNotFound { .. })
        ));
    }
}
