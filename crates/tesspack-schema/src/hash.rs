//! Content digests for staged files.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Read buffer used when hashing streams (64KB).
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// A SHA256 digest (64 lowercase hex characters).
///
/// Digests are only ever computed locally from staged bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Hash an in-memory byte slice.
    pub fn compute(data: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(data)))
    }

    /// Hash everything a reader yields, reading incrementally.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by the reader.
    pub fn compute_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

        loop {
            let bytes_read = reader.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(Self(hex::encode(hasher.finalize())))
    }

    /// Hash a file on disk without loading it into memory at once.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or read.
    pub fn compute_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::compute_reader(file)
    }

    /// Get the digest as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_matches_known_vector() {
        let digest = Sha256Digest::compute(b"");
        assert_eq!(
            digest.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn reader_and_slice_agree() {
        let data = vec![7u8; HASH_BUFFER_SIZE * 2 + 13];
        let from_reader = Sha256Digest::compute_reader(&data[..]).unwrap();
        assert_eq!(from_reader, Sha256Digest::compute(&data));
    }

    #[test]
    fn compute_file_hashes_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        std::fs::write(&path, b"hello world").unwrap();

        let digest = Sha256Digest::compute_file(&path).unwrap();
        assert_eq!(digest, Sha256Digest::compute(b"hello world"));
        assert_eq!(digest.as_str().len(), 64);
    }
}
