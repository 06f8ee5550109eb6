//! Discovery of hash algorithms known to the kernel
//!
//! The kernel publishes its crypto registry in `/proc/crypto`; hash
//! transforms are the entries of type `shash` or `ahash`. Internal-only
//! transforms cannot be bound from user space and are filtered by default.

use std::collections::BTreeSet;

#[cfg(target_os = "linux")]
use crate::error::{IoResultExt, Result};

/// Algorithms the in-process software backend provides
pub const SOFTWARE_ALGORITHMS: &[&str] = &["blake3", "sha224", "sha256", "sha384", "sha512"];

/// List hash algorithms registered with the running kernel
#[cfg(target_os = "linux")]
pub fn kernel_algorithms(include_internal: bool) -> Result<Vec<String>> {
    let text = std::fs::read_to_string("/proc/crypto").with_path("/proc/crypto")?;
    Ok(parse_proc_crypto(&text, include_internal))
}

/// Extract hash algorithm names from `/proc/crypto` content.
///
/// Entries are blank-line-separated blocks of `key : value` lines; a block
/// is a hash transform when its `type` is `shash` or `ahash`.
pub fn parse_proc_crypto(text: &str, include_internal: bool) -> Vec<String> {
    let mut names = BTreeSet::new();

    for block in text.split("\n\n") {
        let mut name = None;
        let mut is_hash = false;
        let mut internal = false;

        for line in block.lines() {
            if let Some((key, value)) = line.split_once(':') {
                match (key.trim(), value.trim()) {
                    ("name", v) => name = Some(v.to_string()),
                    ("type", v) => is_hash = v == "shash" || v == "ahash",
                    ("internal", v) => internal = v == "yes",
                    _ => {}
                }
            }
        }

        if is_hash && (include_internal || !internal) {
            if let Some(name) = name {
                names.insert(name);
            }
        }
    }

    names.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
name         : sha256
driver       : sha256-generic
module       : kernel
priority     : 100
refcnt       : 1
selftest     : passed
internal     : no
type         : shash
blocksize    : 64
digestsize   : 32

name         : cbc(aes)
driver       : cbc-aes-aesni
module       : kernel
priority     : 400
internal     : no
type         : skcipher

name         : sha256
driver       : sha256-ni
module       : kernel
priority     : 250
internal     : no
type         : shash

name         : __sha256-secret
driver       : sha256-hidden
internal     : yes
type         : shash

name         : crc32c
driver       : crc32c-generic
internal     : no
type         : shash
";

    #[test]
    fn test_parse_filters_non_hash_entries() {
        let names = parse_proc_crypto(SAMPLE, false);
        assert!(names.contains(&"sha256".to_string()));
        assert!(names.contains(&"crc32c".to_string()));
        assert!(!names.iter().any(|n| n == "cbc(aes)"));
    }

    #[test]
    fn test_parse_deduplicates_drivers() {
        let names = parse_proc_crypto(SAMPLE, false);
        assert_eq!(names.iter().filter(|n| *n == "sha256").count(), 1);
    }

    #[test]
    fn test_parse_skips_internal_by_default() {
        let names = parse_proc_crypto(SAMPLE, false);
        assert!(!names.iter().any(|n| n == "__sha256-secret"));

        let names = parse_proc_crypto(SAMPLE, true);
        assert!(names.iter().any(|n| n == "__sha256-secret"));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_proc_crypto("", false).is_empty());
    }
}
