//! File content snapshots.

use std::fs::{File, Metadata};
use std::io::{self, Read};
use std::path::Path;

use blake3::Hasher;

use filemirror_core::{ContentHash, FileSnapshot, ScanConfig};

const BUFFER_SIZE: usize = 64 * 1024;

/// Builds [`FileSnapshot`]s for regular files.
#[derive(Debug, Clone, Copy)]
pub struct Snapshotter {
    hash_contents: bool,
    min_hash_size: u64,
}

impl Snapshotter {
    /// Snapshotter that hashes every file.
    pub fn new() -> Self {
        Self {
            hash_contents: true,
            min_hash_size: 0,
        }
    }

    /// Snapshotter following the hashing options of a scan config.
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            hash_contents: config.hash_contents,
            min_hash_size: config.min_hash_size,
        }
    }

    /// Snapshot a file whose metadata has already been read.
    pub fn snapshot(&self, path: &Path, metadata: &Metadata) -> io::Result<FileSnapshot> {
        let size = metadata.len();
        let modified = metadata.modified().unwrap_or(std::time::UNIX_EPOCH);
        let snapshot = FileSnapshot::new(size, modified);

        if !self.hash_contents || size < self.min_hash_size {
            return Ok(snapshot);
        }
        Ok(snapshot.with_hash(hash_file(path)?))
    }
}

impl Default for Snapshotter {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the BLAKE3 hash of a file's contents.
pub fn hash_file(path: &Path) -> io::Result<ContentHash> {
    let mut file = File::open(path)?;
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(ContentHash::new(*hasher.finalize().as_bytes()))
}
