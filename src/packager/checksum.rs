//! Source code hash calculation for the finished package.
//!
//! The hash is the SHA-256 of the zip file exactly as it sits on disk,
//! base64-encoded with the standard alphabet, which is what the AWS provider
//! expects in `aws_lambda_function.source_code_hash`.

use crate::packager::error::{Error, Result};
use base64::Engine;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculates the `source_code_hash` of a written package.
///
/// Reads the file back in 8KB chunks rather than hashing the in-memory
/// bundle, so the hash always matches the bytes the host will upload.
///
/// # Arguments
///
/// * `path` - Path to the zip package
///
/// # Returns
///
/// * `Ok(String)` - Base64 (standard alphabet) SHA-256 digest, 44 characters
/// * `Err(Error::ReadBackPackage)` - If the file cannot be opened or read
pub async fn calculate_source_code_hash(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(Error::ReadBackPackage)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .map_err(Error::ReadBackPackage)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(encode_digest(&hasher.finalize()))
}

fn encode_digest(digest: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_file_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.zip");
        std::fs::write(&path, b"").unwrap();

        assert_eq!(
            calculate_source_code_hash(&path).await.unwrap(),
            "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
    }

    #[tokio::test]
    async fn larger_than_one_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.zip");
        let bytes = vec![7u8; 20_000];
        std::fs::write(&path, &bytes).unwrap();

        let expected = encode_digest(&Sha256::digest(&bytes));
        assert_eq!(calculate_source_code_hash(&path).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_back_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = calculate_source_code_hash(&dir.path().join("gone.zip"))
            .await
            .unwrap_err();
        assert_eq!(
            err.summary(),
            "Failed to read back Lambda package zip to hash it"
        );
    }
}
