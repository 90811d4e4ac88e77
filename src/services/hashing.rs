use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::domain::errors::{StoreError, StoreResult};

const HASH_CHUNK_SIZE: usize = 1024 * 1024;

/// Streaming SHA-256 hex digest of a local file.
///
/// Used for change detection on files that have no remote ETag yet; digests
/// are only compared within one process lifetime.
pub fn hash_file(path: &Path) -> StoreResult<String> {
    let mut file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_CHUNK_SIZE];
    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|e| StoreError::io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, b"hello world").unwrap();

        assert_eq!(
            hash_file(&path).unwrap(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn content_change_changes_digest() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data.bin");

        std::fs::write(&path, b"one").unwrap();
        let first = hash_file(&path).unwrap();
        std::fs::write(&path, b"two").unwrap();
        let second = hash_file(&path).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = hash_file(Path::new("/nonexistent/file.bin")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
