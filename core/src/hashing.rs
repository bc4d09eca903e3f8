//! Streaming SHA-256 fingerprints

use crate::error::ProcessError;
use log::{debug, warn};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Bytes read per chunk while hashing
pub const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// How much of a file the HTTP surface previews before hashing
pub const PREVIEW_LEN: u64 = 100;

/// Outcome of hashing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HashOutcome {
    Hashed { digest: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashResult {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: HashOutcome,
}

impl HashResult {
    pub fn digest(&self) -> Option<&str> {
        match &self.outcome {
            HashOutcome::Hashed { digest } => Some(digest),
            HashOutcome::Failed { .. } => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, HashOutcome::Hashed { .. })
    }
}

/// Lowercase hex SHA-256 of the file's raw bytes, read in fixed-size chunks
pub fn compute_file_hash(path: &Path) -> Result<String, ProcessError> {
    let mut file = File::open(path).map_err(|e| ProcessError::read_failure(path, e))?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

    loop {
        let count = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(count) => count,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ProcessError::read_failure(path, e)),
        };
        hasher.update(&buffer[..count]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hash each file in turn. A failure is recorded and the batch carries on.
pub fn hash_files<P: AsRef<Path>>(paths: &[P]) -> Vec<HashResult> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let outcome = match compute_file_hash(path) {
                Ok(digest) => {
                    debug!("{} -> {}", path.display(), digest);
                    HashOutcome::Hashed { digest }
                }
                Err(err) => {
                    warn!("{}", err);
                    HashOutcome::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            HashResult {
                path: path.to_path_buf(),
                outcome,
            }
        })
        .collect()
}

/// First `limit` bytes of the file decoded as UTF-8; invalid sequences are replaced, never raised
pub fn read_preview(path: &Path, limit: u64) -> Result<String, ProcessError> {
    let file = File::open(path).map_err(|e| ProcessError::read_failure(path, e))?;
    let mut bytes = Vec::new();
    file.take(limit)
        .read_to_end(&mut bytes)
        .map_err(|e| ProcessError::read_failure(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_known_digests() {
        let temp_dir = TempDir::new().unwrap();
        let empty = temp_dir.path().join("empty.txt");
        let abc = temp_dir.path().join("abc.txt");
        fs::write(&empty, b"").unwrap();
        fs::write(&abc, b"abc").unwrap();

        assert_eq!(compute_file_hash(&empty).unwrap(), EMPTY_SHA256);
        assert_eq!(compute_file_hash(&abc).unwrap(), ABC_SHA256);
    }

    #[test]
    fn test_digest_is_deterministic_lowercase_hex() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.pdf");
        fs::write(&path, b"%PDF-1.7 not really a pdf").unwrap();

        let first = compute_file_hash(&path).unwrap();
        let second = compute_file_hash(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_multi_chunk_file_matches_one_shot_digest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("big.csv");
        let content: Vec<u8> = (0..HASH_BUFFER_SIZE * 3 + 17).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &content).unwrap();

        let expected = hex::encode(Sha256::digest(&content));
        assert_eq!(compute_file_hash(&path).unwrap(), expected);
    }

    #[test]
    fn test_binary_content_is_not_normalized() {
        let temp_dir = TempDir::new().unwrap();
        let unix = temp_dir.path().join("unix.txt");
        let dos = temp_dir.path().join("dos.txt");
        fs::write(&unix, b"line\n").unwrap();
        fs::write(&dos, b"line\r\n").unwrap();

        assert_ne!(compute_file_hash(&unix).unwrap(), compute_file_hash(&dos).unwrap());
    }

    #[test]
    fn test_missing_file_is_read_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone.pdf");

        let err = compute_file_hash(&path).unwrap_err();
        assert!(matches!(err, ProcessError::ReadFailure { ref path, .. } if path.ends_with("gone.pdf")));
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("a.txt");
        let missing = temp_dir.path().join("b.txt");
        let also_good = temp_dir.path().join("c.txt");
        fs::write(&good, b"abc").unwrap();
        fs::write(&also_good, b"").unwrap();

        let results = hash_files(&[good.clone(), missing.clone(), also_good.clone()]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].digest(), Some(ABC_SHA256));
        assert!(!results[1].is_ok());
        assert_eq!(results[1].path, missing);
        assert_eq!(results[2].digest(), Some(EMPTY_SHA256));
    }

    #[test]
    fn test_result_serializes_flat() {
        let result = HashResult {
            path: PathBuf::from("a.txt"),
            outcome: HashOutcome::Hashed {
                digest: ABC_SHA256.to_string(),
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["path"], "a.txt");
        assert_eq!(json["status"], "hashed");
        assert_eq!(json["digest"], ABC_SHA256);
    }

    #[test]
    fn test_preview_truncates_and_tolerates_bad_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let long = temp_dir.path().join("long.txt");
        let binary = temp_dir.path().join("blob.docx");
        fs::write(&long, "x".repeat(500)).unwrap();
        fs::write(&binary, [0x50, 0x4b, 0xff, 0xfe, 0x03, 0x04]).unwrap();

        assert_eq!(read_preview(&long, PREVIEW_LEN).unwrap().len(), 100);
        let preview = read_preview(&binary, PREVIEW_LEN).unwrap();
        assert!(preview.starts_with("PK"));
    }

    #[test]
    fn test_preview_with_unbounded_limit_reads_whole_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("short.txt");
        fs::write(&path, "abc").unwrap();

        assert_eq!(read_preview(&path, u64::MAX).unwrap(), "abc");
    }

    #[test]
    fn test_preview_of_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_preview(&temp_dir.path().join("nope.txt"), PREVIEW_LEN).unwrap_err();
        assert!(matches!(err, ProcessError::ReadFailure { .. }));
    }
}
