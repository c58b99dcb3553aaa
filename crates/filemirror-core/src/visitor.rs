//! Path-tracking adapter over the enter/visit/exit walking protocol.
//!
//! A walker drives a [`HierarchicalVisitor`] in depth-first pre-order:
//! `enter_directory` for every directory (the root first), `visit_entry` for
//! every file, and `exit_directory` once a directory's children are done.
//! [`PathTrackingVisitor`] turns those three events into a single
//! [`EntryVisitor::visit`] call per non-root entry, carrying the entry's
//! path relative to the root.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use compact_str::CompactString;

use crate::error::VisitError;
use crate::snapshot::Content;

/// Push protocol implemented by anything a walker can drive.
///
/// `S` is the walker's file snapshot type.
pub trait HierarchicalVisitor<S> {
    /// Called before the children of a directory. The first call is the root.
    fn enter_directory(&mut self, path: &Path, name: &str);

    /// Called once for each file.
    fn visit_entry(&mut self, path: &Path, name: &str, snapshot: S);

    /// Called after the children of a directory, including the root.
    fn exit_directory(&mut self);
}

/// Consumer of normalized entry events.
///
/// `relative_path` borrows the visitor's live stack and is only valid for the
/// duration of the call; copy it to keep it.
pub trait EntryVisitor<S> {
    /// Called for every entry below the root, directories before their children.
    fn visit(&mut self, path: &Path, name: &str, relative_path: RelativePath<'_>, content: Content<S>);
}

impl<S, F> EntryVisitor<S> for F
where
    F: FnMut(&Path, &str, RelativePath<'_>, Content<S>),
{
    fn visit(&mut self, path: &Path, name: &str, relative_path: RelativePath<'_>, content: Content<S>) {
        self(path, name, relative_path, content)
    }
}

/// Borrowed view of the segments from the root (excluded) to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativePath<'a> {
    segments: &'a [CompactString],
}

impl<'a> RelativePath<'a> {
    /// Wrap a slice of segments.
    pub fn new(segments: &'a [CompactString]) -> Self {
        Self { segments }
    }

    /// The segments, outermost first.
    pub fn segments(&self) -> &'a [CompactString] {
        self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True only at the root.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The last segment, i.e. the entry's own name.
    pub fn name(&self) -> Option<&'a str> {
        self.segments.last().map(CompactString::as_str)
    }

    /// Iterate over segments as string slices.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.segments.iter().map(CompactString::as_str)
    }

    /// Copy the segments out of the live stack.
    pub fn to_vec(&self) -> Vec<CompactString> {
        self.segments.to_vec()
    }

    /// Join the segments into a platform path.
    pub fn to_path_buf(&self) -> PathBuf {
        self.iter().collect()
    }
}

impl fmt::Display for RelativePath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

/// Tracks the relative path of the walker's current position and reports
/// every entry below the root to a consumer.
///
/// One instance serves exactly one traversal.
#[derive(Debug)]
pub struct PathTrackingVisitor<S, V> {
    relative_path: Vec<CompactString>,
    visited_root: bool,
    exited_root: bool,
    unbalanced_exits: usize,
    consumer: V,
    _snapshot: PhantomData<fn(S)>,
}

impl<S, V: EntryVisitor<S>> PathTrackingVisitor<S, V> {
    /// Create a visitor that has not seen the root yet.
    pub fn new(consumer: V) -> Self {
        Self {
            relative_path: Vec::new(),
            visited_root: false,
            exited_root: false,
            unbalanced_exits: 0,
            consumer,
            _snapshot: PhantomData,
        }
    }
}

impl<S, V> PathTrackingVisitor<S, V> {
    /// Number of directories currently open below the root.
    pub fn depth(&self) -> usize {
        self.relative_path.len()
    }

    /// The current relative path.
    pub fn relative_path(&self) -> RelativePath<'_> {
        RelativePath::new(&self.relative_path)
    }

    /// Whether the root directory has been entered.
    pub fn has_visited_root(&self) -> bool {
        self.visited_root
    }

    /// Number of exits received with nothing left to exit.
    pub fn unbalanced_exits(&self) -> usize {
        self.unbalanced_exits
    }

    /// Borrow the consumer.
    pub fn consumer(&self) -> &V {
        &self.consumer
    }

    /// Give back the consumer without checking nesting.
    pub fn into_inner(self) -> V {
        self.consumer
    }

    /// Give back the consumer, failing if the walker's calls were not
    /// correctly nested.
    pub fn finish(self) -> Result<V, VisitError> {
        if self.unbalanced_exits > 0 {
            return Err(VisitError::UnbalancedExit {
                count: self.unbalanced_exits,
            });
        }
        if !self.relative_path.is_empty() {
            return Err(VisitError::UnclosedDirectories {
                depth: self.relative_path.len(),
            });
        }
        Ok(self.consumer)
    }
}

impl<S, V: EntryVisitor<S>> HierarchicalVisitor<S> for PathTrackingVisitor<S, V> {
    fn enter_directory(&mut self, path: &Path, name: &str) {
        if !self.visited_root {
            self.visited_root = true;
            return;
        }
        self.relative_path.push(CompactString::from(name));
        tracing::trace!(relative_path = %self.relative_path(), "directory");
        self.consumer.visit(
            path,
            name,
            RelativePath::new(&self.relative_path),
            Content::Directory,
        );
    }

    fn visit_entry(&mut self, path: &Path, name: &str, snapshot: S) {
        self.relative_path.push(CompactString::from(name));
        tracing::trace!(relative_path = %self.relative_path(), "file");
        self.consumer.visit(
            path,
            name,
            RelativePath::new(&self.relative_path),
            Content::File(snapshot),
        );
        self.relative_path.pop();
    }

    fn exit_directory(&mut self) {
        if self.relative_path.pop().is_some() {
            return;
        }
        if self.visited_root && !self.exited_root {
            self.exited_root = true;
            return;
        }
        self.unbalanced_exits += 1;
        tracing::warn!(
            unbalanced_exits = self.unbalanced_exits,
            "exit_directory called with no open directory"
        );
    }
}
