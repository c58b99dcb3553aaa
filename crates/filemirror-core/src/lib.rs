//! Core types and traits for filemirror.
//!
//! This crate turns the enter/visit/exit calls of a depth-first directory
//! walker into one callback per entry carrying the entry's path relative to
//! the walked root, along with the types shared by the walker and the CLI:
//! content snapshots, configuration, errors and walk summaries.
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//!
//! use filemirror_core::{HierarchicalVisitor, PathTrackingVisitor, SnapshotCollector};
//!
//! let mut visitor = PathTrackingVisitor::new(SnapshotCollector::<u64>::new());
//! visitor.enter_directory(Path::new("/repo"), "repo");
//! visitor.enter_directory(Path::new("/repo/src"), "src");
//! visitor.visit_entry(Path::new("/repo/src/lib.rs"), "lib.rs", 42);
//! visitor.exit_directory();
//! visitor.exit_directory();
//!
//! let collector = visitor.finish().unwrap();
//! assert_eq!(collector.paths().collect::<Vec<_>>(), ["src", "src/lib.rs"]);
//! ```

mod collect;
mod config;
mod error;
pub mod project;
mod snapshot;
mod summary;
mod visitor;

pub use collect::{EntryCounter, MirrorEntry, SnapshotCollector};
pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{ProjectError, ScanError, ScanWarning, VisitError, WarningKind};
pub use snapshot::{Content, ContentHash, FileSnapshot};
pub use summary::{WalkStats, WalkSummary};
pub use visitor::{EntryVisitor, HierarchicalVisitor, PathTrackingVisitor, RelativePath};
