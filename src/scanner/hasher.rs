//! Streaming file hashing.
//!
//! Files are read in fixed-size chunks and folded into the selected digest,
//! so memory usage stays constant regardless of file size. Fingerprints are
//! lowercase hex strings; two files with equal fingerprints are treated as
//! duplicates regardless of name or location.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Chunk size for streaming reads.
pub const CHUNK_SIZE: usize = 8192;

/// Content fingerprint: a lowercase hex digest of file bytes (raw mode) or
/// normalized source text (source mode).
pub type Fingerprint = String;

/// Digest used for fingerprinting.
///
/// BLAKE3 is the default: this is a duplicate finder, not a security
/// boundary, so the faster digest wins. SHA-256 is available for callers
/// that need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// BLAKE3 (fast, default).
    #[default]
    Blake3,
    /// SHA-256.
    Sha256,
}

/// Errors that can occur while hashing a file.
#[derive(Debug, Error)]
pub enum HashError {
    /// The file was not found.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when opening or reading the file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Any other I/O error while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl HashError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Hash a file's raw bytes, streaming in [`CHUNK_SIZE`] chunks.
///
/// Returns the lowercase hex fingerprint, or a [`HashError`] if the file
/// cannot be opened or read. The caller decides whether that is fatal; the
/// scanner logs and skips.
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<Fingerprint, HashError> {
    let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
    let mut buf = [0u8; CHUNK_SIZE];

    match algorithm {
        HashAlgorithm::Blake3 => {
            let mut hasher = blake3::Hasher::new();
            loop {
                let n = file.read(&mut buf).map_err(|e| HashError::from_io(path, e))?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
            Ok(hasher.finalize().to_hex().to_string())
        }
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            loop {
                let n = file.read(&mut buf).map_err(|e| HashError::from_io(path, e))?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
            Ok(hex_string(&hasher.finalize()))
        }
    }
}

/// Hash an in-memory byte slice with the selected digest.
///
/// Used by normalized-source hashing, which must transform the text before
/// digesting it.
pub fn hash_bytes(bytes: &[u8], algorithm: HashAlgorithm) -> Fingerprint {
    match algorithm {
        HashAlgorithm::Blake3 => blake3::hash(bytes).to_hex().to_string(),
        HashAlgorithm::Sha256 => hex_string(&Sha256::digest(bytes)),
    }
}

fn hex_string(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}
