//! Streaming content digest computation

use replisync_types::{Error, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::trace;

/// Chunk size for streaming reads
const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the BLAKE3 digest of a file's full contents
///
/// The file is read in chunks so that arbitrarily large files never have to
/// fit in memory, and the handle is closed on every exit path including
/// errors. Read failures propagate as typed errors rather than being folded
/// into an equality decision.
pub async fn file_digest<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let mut file = File::open(path)
        .await
        .map_err(|e| Error::from_io(path, &e))?;

    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let read = file
            .read(&mut buffer)
            .await
            .map_err(|e| Error::from_io(path, &e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    let hash = hasher.finalize().to_hex().to_string();
    trace!("Digest for '{}': {}", path.display(), hash);
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::fs;

    #[tokio::test]
    async fn test_digest_matches_blake3_reference() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");
        fs::write(&file_path, b"test content").await.unwrap();

        let digest = file_digest(&file_path).await.unwrap();
        let expected = blake3::hash(b"test content").to_hex().to_string();
        assert_eq!(digest, expected);
    }

    #[tokio::test]
    async fn test_digest_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("empty.txt");
        fs::write(&file_path, b"").await.unwrap();

        let digest = file_digest(&file_path).await.unwrap();
        assert_eq!(digest, blake3::hash(b"").to_hex().to_string());
    }

    #[tokio::test]
    async fn test_digest_spans_multiple_chunks() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("large.bin");
        let content = vec![0xabu8; CHUNK_SIZE * 3 + 17];
        fs::write(&file_path, &content).await.unwrap();

        let digest = file_digest(&file_path).await.unwrap();
        assert_eq!(digest, blake3::hash(&content).to_hex().to_string());
    }

    #[tokio::test]
    async fn test_digest_missing_file_is_typed_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.txt");

        let err = file_digest(&missing).await.unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
