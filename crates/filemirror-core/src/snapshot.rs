//! Content descriptors and file snapshot types.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// BLAKE3 content hash of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// What is known about a regular file's content at the time it was visited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSnapshot {
    /// Length in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Content hash, if hashing was enabled and the file was large enough.
    pub hash: Option<ContentHash>,
}

impl FileSnapshot {
    /// Snapshot from size and modification time only.
    pub fn new(size: u64, modified: SystemTime) -> Self {
        Self {
            size,
            modified,
            hash: None,
        }
    }

    /// Attach a content hash.
    pub fn with_hash(mut self, hash: ContentHash) -> Self {
        self.hash = Some(hash);
        self
    }
}

/// Content descriptor handed to consumers for every reported entry.
///
/// Directories carry no content of their own, so they share the single
/// [`Content::Directory`] marker. Files carry whatever snapshot the walker
/// produced; this crate never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "snapshot", rename_all = "snake_case")]
pub enum Content<S> {
    /// Directory marker.
    Directory,
    /// File with a walker-supplied snapshot.
    File(S),
}

impl<S> Content<S> {
    /// Check if this is the directory marker.
    pub fn is_dir(&self) -> bool {
        matches!(self, Content::Directory)
    }

    /// Check if this carries a file snapshot.
    pub fn is_file(&self) -> bool {
        matches!(self, Content::File(_))
    }

    /// Borrow the file snapshot, if any.
    pub fn snapshot(&self) -> Option<&S> {
        match self {
            Content::File(snapshot) => Some(snapshot),
            Content::Directory => None,
        }
    }

    /// Take the file snapshot, if any.
    pub fn into_snapshot(self) -> Option<S> {
        match self {
            Content::File(snapshot) => Some(snapshot),
            Content::Directory => None,
        }
    }

    /// Map the file snapshot, leaving the directory marker untouched.
    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> Content<T> {
        match self {
            Content::File(snapshot) => Content::File(f(snapshot)),
            Content::Directory => Content::Directory,
        }
    }
}
