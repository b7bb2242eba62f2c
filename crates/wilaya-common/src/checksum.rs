//! Checksum utilities for output artifacts

use crate::error::{Result, WilayaError};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Compute the SHA-256 checksum of an in-memory buffer
pub fn compute_checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Compute the SHA-256 checksum of any readable source
fn compute_reader_checksum<R: Read>(reader: &mut R) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Compute the SHA-256 checksum of a file
pub fn compute_file_checksum(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let mut file =
        std::fs::File::open(path).map_err(|e| WilayaError::source_unavailable(path, e))?;
    compute_reader_checksum(&mut file)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            compute_checksum(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_file_matches_buffer() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\n  \"Algiers\": {}\n}").unwrap();
        file.flush().unwrap();

        let from_file = compute_file_checksum(file.path()).unwrap();
        assert_eq!(from_file, compute_checksum(b"{\n  \"Algiers\": {}\n}"));
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = compute_file_checksum("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, WilayaError::SourceUnavailable { .. }));
    }
}
