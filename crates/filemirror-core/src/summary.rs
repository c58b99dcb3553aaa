//! Walk summary and statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::error::ScanWarning;

/// Counters gathered by a walker while it drives a visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    /// Files handed to `visit_entry`.
    pub files: u64,
    /// Directories entered, excluding the root.
    pub directories: u64,
    /// Entries not reported (symlinks, special files, ignored names, errors).
    pub skipped: u64,
    /// Sum of reported file sizes.
    pub total_size: u64,
    /// Maximum depth reached.
    pub max_depth: u32,
}

impl WalkStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reported file.
    pub fn record_file(&mut self, size: u64, depth: u32) {
        self.files += 1;
        self.total_size += size;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record an entered directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.directories += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record an entry that was not reported.
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }
}

/// Outcome of a completed walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkSummary {
    /// Canonical root path that was walked.
    pub root_path: PathBuf,

    /// When the walk finished.
    pub walked_at: SystemTime,

    /// Duration of the walk.
    pub duration: Duration,

    /// Counters.
    pub stats: WalkStats,

    /// Warnings encountered during the walk.
    pub warnings: Vec<ScanWarning>,
}

impl WalkSummary {
    /// Create a new walk summary.
    pub fn new(
        root_path: PathBuf,
        stats: WalkStats,
        duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        Self {
            root_path,
            walked_at: SystemTime::now(),
            duration,
            stats,
            warnings,
        }
    }

    /// Check if there were any warnings during the walk.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
