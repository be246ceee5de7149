//! SHA-256 content digests for media files
//!
//! Files are streamed through the hasher in fixed-size chunks so large media
//! does not have to be held in memory.

use crate::error::Result;
use crate::types::ContentHash;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Number of hex characters of the content hash used in derived names
///
/// Used as the default run-binding id and as the collision-avoidance
/// segment of artifact entry names.
pub const HASH_PREFIX_LEN: usize = 20;

const READ_CHUNK: usize = 64 * 1024;

/// Hash an in-memory buffer
pub fn sha256_bytes(data: &[u8]) -> ContentHash {
    ContentHash::from_digest(&Sha256::digest(data))
}

/// Hash a file's full contents, returning the digest and the byte count read
pub fn sha256_file(path: &Path) -> Result<(ContentHash, u64)> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(READ_CHUNK, file);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK];
    let mut total = 0u64;

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }

    Ok((ContentHash::from_digest(&hasher.finalize()), total))
}
