//! Content fingerprints for the summary cache.

use crate::domain::Fingerprint;
use crate::error::{IoResultExt, ReorgError, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 1024;

/// SHA-256 of the file's bytes as lowercase hex.
///
/// Paths that do not name an existing regular file yield an empty fingerprint
/// rather than an error, so callers can treat them as a cache miss.
pub fn hash_file(path: &Path) -> Result<Fingerprint> {
    if !path.is_file() {
        return Ok(Fingerprint::empty());
    }

    let mut file = File::open(path).at(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(ReorgError::Io { path: path.to_path_buf(), source: err }),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(Fingerprint::from_hex(format!("{:x}", hasher.finalize())))
}
