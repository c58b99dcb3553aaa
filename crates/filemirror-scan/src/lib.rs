//! Directory walking and content snapshotting for filemirror.
//!
//! [`JwalkWalker`] reads a directory tree with jwalk and drives any
//! [`HierarchicalVisitor`] through balanced enter/visit/exit calls in sorted
//! depth-first pre-order. [`Snapshotter`] turns each regular file into a
//! [`FileSnapshot`] (size, modification time and an optional BLAKE3 hash).
//!
//! # Example
//!
//! ```rust,no_run
//! use filemirror_scan::{JwalkWalker, PathTrackingVisitor, ScanConfig, SnapshotCollector};
//!
//! let config = ScanConfig::new("/path/to/walk");
//! let mut visitor = PathTrackingVisitor::new(SnapshotCollector::new());
//! let summary = JwalkWalker::new().walk(&config, &mut visitor).unwrap();
//!
//! for (path, snapshot) in visitor.finish().unwrap().files() {
//!     println!("{path}: {} bytes", snapshot.size);
//! }
//! println!("{} warnings", summary.warnings.len());
//! ```

mod hasher;
mod walker;

pub use hasher::{Snapshotter, hash_file};
pub use walker::JwalkWalker;

// Re-export core types for convenience
pub use filemirror_core::{
    Content, ContentHash, EntryCounter, EntryVisitor, FileSnapshot, HierarchicalVisitor,
    MirrorEntry, PathTrackingVisitor, RelativePath, ScanConfig, ScanError, ScanWarning,
    SnapshotCollector, VisitError, WalkStats, WalkSummary, WarningKind,
};
