//! Ready-made entry consumers.

use std::path::Path;

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::snapshot::Content;
use crate::visitor::{EntryVisitor, RelativePath};

/// A reported entry, with its relative path copied out of the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorEntry<S> {
    /// Segments from the root (excluded) to this entry.
    pub relative_path: Vec<CompactString>,
    /// Directory marker or file snapshot.
    pub content: Content<S>,
}

impl<S> MirrorEntry<S> {
    /// Entry name (last path segment).
    pub fn name(&self) -> &str {
        self.relative_path.last().map(CompactString::as_str).unwrap_or_default()
    }

    /// Depth below the root; top-level entries are at depth 1.
    pub fn depth(&self) -> usize {
        self.relative_path.len()
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.content.is_dir()
    }
}

/// Collects every reported entry in visit order, keyed by `/`-joined
/// relative path.
#[derive(Debug, Clone)]
pub struct SnapshotCollector<S> {
    entries: IndexMap<String, MirrorEntry<S>>,
}

impl<S> SnapshotCollector<S> {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Number of collected entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in visit order.
    pub fn entries(&self) -> impl Iterator<Item = &MirrorEntry<S>> {
        self.entries.values()
    }

    /// Consume the collector, returning entries in visit order.
    pub fn into_entries(self) -> Vec<MirrorEntry<S>> {
        self.entries.into_values().collect()
    }

    /// Look up an entry by its `/`-joined relative path (e.g. `"src/lib.rs"`).
    pub fn get(&self, relative_path: &str) -> Option<&MirrorEntry<S>> {
        self.entries.get(relative_path)
    }

    /// Iterate over `/`-joined paths in visit order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// File entries with their snapshots.
    pub fn files(&self) -> impl Iterator<Item = (&str, &S)> {
        self.entries
            .iter()
            .filter_map(|(path, entry)| entry.content.snapshot().map(|s| (path.as_str(), s)))
    }

    /// Directory entries.
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_dir())
            .map(|(path, _)| path.as_str())
    }
}

impl<S> Default for SnapshotCollector<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> EntryVisitor<S> for SnapshotCollector<S> {
    fn visit(&mut self, _path: &Path, _name: &str, relative_path: RelativePath<'_>, content: Content<S>) {
        let entry = MirrorEntry {
            relative_path: relative_path.to_vec(),
            content,
        };
        // A walker that reports the same path twice keeps the latest content.
        self.entries.insert(relative_path.to_string(), entry);
    }
}

/// Counts reported entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryCounter {
    /// Directories below the root.
    pub directories: u64,
    /// Files.
    pub files: u64,
    /// Longest relative path seen.
    pub max_depth: usize,
}

impl EntryCounter {
    /// Create a zeroed counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entries reported.
    pub fn total(&self) -> u64 {
        self.directories + self.files
    }
}

impl<S> EntryVisitor<S> for EntryCounter {
    fn visit(&mut self, _path: &Path, _name: &str, relative_path: RelativePath<'_>, content: Content<S>) {
        match content {
            Content::Directory => self.directories += 1,
            Content::File(_) => self.files += 1,
        }
        self.max_depth = self.max_depth.max(relative_path.len());
    }
}
