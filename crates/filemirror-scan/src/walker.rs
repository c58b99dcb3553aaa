//! JWalk-based directory walker.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use jwalk::{Parallelism, WalkDir};

use filemirror_core::{
    FileSnapshot, HierarchicalVisitor, ScanConfig, ScanError, ScanWarning, WalkStats,
    WalkSummary, WarningKind,
};

use crate::hasher::Snapshotter;

/// Walks a directory with jwalk and drives a [`HierarchicalVisitor`].
///
/// Entries are delivered in depth-first pre-order with siblings sorted by
/// name, and enter/exit calls are always balanced, the root included.
#[derive(Debug, Default)]
pub struct JwalkWalker;

impl JwalkWalker {
    /// Create a new walker.
    pub fn new() -> Self {
        Self
    }

    /// Walk `config.root`, reporting every directory and regular file to
    /// `visitor`.
    pub fn walk<V>(&self, config: &ScanConfig, visitor: &mut V) -> Result<WalkSummary, ScanError>
    where
        V: HierarchicalVisitor<FileSnapshot>,
    {
        let start = Instant::now();
        let root_path = config
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&config.root, e))?;

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory { path: root_path });
        }

        tracing::debug!(root = %root_path.display(), "walk started");

        let snapshotter = Snapshotter::from_config(config);
        let mut stats = WalkStats::new();
        let mut warnings = Vec::new();

        self.drive(config, &root_path, &snapshotter, visitor, &mut stats, &mut warnings);

        let duration = start.elapsed();
        tracing::debug!(
            files = stats.files,
            directories = stats.directories,
            skipped = stats.skipped,
            warnings = warnings.len(),
            ?duration,
            "walk finished"
        );

        Ok(WalkSummary::new(root_path, stats, duration, warnings))
    }

    fn drive<V>(
        &self,
        config: &ScanConfig,
        root_path: &Path,
        snapshotter: &Snapshotter,
        visitor: &mut V,
        stats: &mut WalkStats,
        warnings: &mut Vec<ScanWarning>,
    ) where
        V: HierarchicalVisitor<FileSnapshot>,
    {
        let parallelism = match config.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: std::time::Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        let walker = WalkDir::new(root_path)
            .parallelism(parallelism)
            .sort(true)
            .skip_hidden(!config.include_hidden)
            .follow_links(config.follow_symlinks)
            .min_depth(0)
            .max_depth(config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX));

        // Directories entered so far and not yet exited, the root included.
        // An entry at depth d sits directly under the d-th open directory.
        let mut open_dirs: usize = 0;
        // Depth of an ignored directory whose descendants are being skipped.
        let mut pruned_at: Option<usize> = None;

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    if is_pruned(&mut pruned_at, err.depth()) {
                        continue;
                    }
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    tracing::warn!(path = %path.display(), error = %err, "read error");
                    warnings.push(classify_error(config, path, &err));
                    stats.record_skipped();
                    continue;
                }
            };

            let depth = entry.depth();
            if is_pruned(&mut pruned_at, depth) {
                continue;
            }

            while open_dirs > depth {
                visitor.exit_directory();
                open_dirs -= 1;
            }

            let path = entry.path();

            if depth == 0 {
                let name = entry.file_name().to_string_lossy();
                visitor.enter_directory(&path, &name);
                open_dirs = 1;
                continue;
            }

            // Lossy conversion would merge distinct names into one.
            let Some(name) = entry.file_name().to_str() else {
                tracing::warn!(path = %path.display(), "skipping non UTF-8 name");
                warnings.push(ScanWarning::invalid_name(&path));
                stats.record_skipped();
                pruned_at = Some(depth);
                continue;
            };

            if config.should_ignore(name) {
                stats.record_skipped();
                pruned_at = Some(depth);
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_dir() {
                stats.record_dir(depth as u32);
                visitor.enter_directory(&path, name);
                open_dirs += 1;
            } else if file_type.is_file() {
                let metadata = match entry.metadata() {
                    Ok(m) => m,
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "metadata error");
                        warnings.push(ScanWarning::new(
                            &path,
                            err.to_string(),
                            WarningKind::MetadataError,
                        ));
                        stats.record_skipped();
                        continue;
                    }
                };

                match snapshotter.snapshot(&path, &metadata) {
                    Ok(snapshot) => {
                        stats.record_file(snapshot.size, depth as u32);
                        visitor.visit_entry(&path, name, snapshot);
                    }
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "snapshot error");
                        warnings.push(ScanWarning::snapshot_error(&path, &err));
                        stats.record_skipped();
                    }
                }
            } else {
                stats.record_skipped();
            }
        }

        while open_dirs > 0 {
            visitor.exit_directory();
            open_dirs -= 1;
        }
    }
}

/// Clear the pruning marker once the walk leaves the ignored subtree, and
/// report whether an item at `depth` is still inside it.
fn is_pruned(pruned_at: &mut Option<usize>, depth: usize) -> bool {
    match *pruned_at {
        Some(pruned) if depth > pruned => true,
        Some(_) => {
            *pruned_at = None;
            false
        }
        None => false,
    }
}

/// Turn a jwalk error into a warning. When following links, an unresolvable
/// link surfaces here rather than as an entry.
fn classify_error(config: &ScanConfig, path: PathBuf, err: &jwalk::Error) -> ScanWarning {
    if config.follow_symlinks
        && fs::symlink_metadata(&path).is_ok_and(|m| m.file_type().is_symlink())
        && fs::metadata(&path).is_err()
    {
        return ScanWarning::broken_symlink(path);
    }
    if err
        .io_error()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
    {
        return ScanWarning::permission_denied(path);
    }
    ScanWarning::new(path, err.to_string(), WarningKind::ReadError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filemirror_core::{EntryCounter, PathTrackingVisitor, SnapshotCollector};
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = tempfile::Builder::new().prefix("walk").tempdir().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();

        temp
    }

    fn collect(config: &ScanConfig) -> (SnapshotCollector<FileSnapshot>, WalkSummary) {
        let mut visitor = PathTrackingVisitor::new(SnapshotCollector::new());
        let summary = JwalkWalker::new().walk(config, &mut visitor).unwrap();
        (visitor.finish().unwrap(), summary)
    }

    #[test]
    fn test_walk_reports_sorted_pre_order() {
        let temp = create_test_tree();
        let (collector, summary) = collect(&ScanConfig::new(temp.path()));

        assert_eq!(
            collector.paths().collect::<Vec<_>>(),
            vec![
                "dir1",
                "dir1/file2.txt",
                "dir1/subdir",
                "dir1/subdir/file3.txt",
                "dir2",
                "dir2/file4.txt",
                "file1.txt",
            ]
        );
        assert_eq!(summary.stats.files, 4);
        assert_eq!(summary.stats.directories, 3);
        assert_eq!(summary.stats.max_depth, 3);
        assert_eq!(summary.stats.total_size, 5 + 17 + 4 + 17);
        assert!(!summary.has_warnings());
    }

    #[test]
    fn test_walk_is_balanced() {
        let temp = create_test_tree();
        let mut visitor = PathTrackingVisitor::new(EntryCounter::new());
        JwalkWalker::new()
            .walk(&ScanConfig::new(temp.path()), &mut visitor)
            .unwrap();

        assert_eq!(visitor.depth(), 0);
        assert_eq!(visitor.unbalanced_exits(), 0);
        let counter = visitor.finish().unwrap();
        assert_eq!(counter.files, 4);
        assert_eq!(counter.directories, 3);
    }

    #[test]
    fn test_ignored_directory_prunes_subtree() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .ignore_patterns(vec!["dir1".to_string()])
            .build()
            .unwrap();
        let (collector, summary) = collect(&config);

        assert_eq!(
            collector.paths().collect::<Vec<_>>(),
            vec!["dir2", "dir2/file4.txt", "file1.txt"]
        );
        assert_eq!(summary.stats.skipped, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_errors_inside_ignored_subtree_are_dropped() {
        let temp = create_test_tree();
        std::os::unix::fs::symlink(
            temp.path().join("nowhere"),
            temp.path().join("dir1/subdir/broken"),
        )
        .unwrap();
        let config = ScanConfig::builder()
            .root(temp.path())
            .follow_symlinks(true)
            .ignore_patterns(vec!["dir1".to_string()])
            .build()
            .unwrap();
        let (collector, summary) = collect(&config);

        assert_eq!(
            collector.paths().collect::<Vec<_>>(),
            vec!["dir2", "dir2/file4.txt", "file1.txt"]
        );
        assert!(!summary.has_warnings());
        assert_eq!(summary.stats.skipped, 1);
    }

    #[test]
    fn test_is_pruned_clears_on_leaving_subtree() {
        let mut pruned_at = Some(1);
        assert!(is_pruned(&mut pruned_at, 2));
        assert!(is_pruned(&mut pruned_at, 3));
        assert!(!is_pruned(&mut pruned_at, 1));
        assert_eq!(pruned_at, None);
        assert!(!is_pruned(&mut pruned_at, 2));
    }

    #[test]
    fn test_max_depth() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .max_depth(Some(1))
            .build()
            .unwrap();
        let (collector, _) = collect(&config);

        assert_eq!(
            collector.paths().collect::<Vec<_>>(),
            vec!["dir1", "dir2", "file1.txt"]
        );
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = create_test_tree();
        let mut visitor = PathTrackingVisitor::new(EntryCounter::new());
        let err = JwalkWalker::new()
            .walk(&ScanConfig::new(temp.path().join("file1.txt")), &mut visitor)
            .unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));

        let err = JwalkWalker::new()
            .walk(&ScanConfig::new(temp.path().join("missing")), &mut visitor)
            .unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
        assert!(!visitor.has_visited_root());
    }
}
