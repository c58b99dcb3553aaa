use filemirror_core::project::{Build, BuildId, BuildRegistry, ProjectFinder};
use filemirror_core::{
    Content, ContentHash, EntryCounter, FileSnapshot, HierarchicalVisitor, PathTrackingVisitor,
    ProjectError, RelativePath, SnapshotCollector, VisitError,
};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// In-memory tree used to drive visitors the way a walker would.
enum Node {
    Dir(&'static str, Vec<Node>),
    File(&'static str, u64),
}

fn sample_tree() -> Node {
    Node::Dir(
        "root",
        vec![
            Node::File("README.md", 1),
            Node::Dir(
                "a",
                vec![
                    Node::Dir("b", vec![Node::File("c", 2)]),
                    Node::File("d", 3),
                    Node::Dir("empty", vec![]),
                ],
            ),
            Node::File("z", 4),
        ],
    )
}

fn walk<V: HierarchicalVisitor<u64>>(node: &Node, parent: &Path, visitor: &mut V) {
    match node {
        Node::Dir(name, children) => {
            let path = parent.join(name);
            visitor.enter_directory(&path, name);
            for child in children {
                walk(child, &path, visitor);
            }
            visitor.exit_directory();
        }
        Node::File(name, size) => {
            visitor.visit_entry(&parent.join(name), name, *size);
        }
    }
}

/// Depth of every node below the root, in pre-order, root at depth 1.
fn expected_depths(node: &Node, depth: usize, out: &mut Vec<(String, usize)>) {
    match node {
        Node::Dir(name, children) => {
            if depth > 1 {
                out.push((name.to_string(), depth));
            }
            for child in children {
                expected_depths(child, depth + 1, out);
            }
        }
        Node::File(name, _) => out.push((name.to_string(), depth)),
    }
}

#[test]
fn test_relative_path_length_matches_depth() {
    let tree = sample_tree();
    let mut observed = Vec::new();
    let mut visitor = PathTrackingVisitor::new(
        |_: &Path, name: &str, rel: RelativePath<'_>, _: Content<u64>| {
            observed.push((name.to_string(), rel.len()));
        },
    );
    walk(&tree, Path::new("/"), &mut visitor);
    visitor.finish().unwrap();

    let mut expected = Vec::new();
    expected_depths(&tree, 1, &mut expected);
    let expected: Vec<(String, usize)> = expected.into_iter().map(|(n, d)| (n, d - 1)).collect();
    assert_eq!(observed, expected);
}

#[test]
fn test_pre_order_with_full_paths() {
    let mut visitor = PathTrackingVisitor::new(SnapshotCollector::<u64>::new());
    walk(&sample_tree(), Path::new("/"), &mut visitor);
    let collector = visitor.finish().unwrap();

    assert_eq!(
        collector.paths().collect::<Vec<_>>(),
        vec!["README.md", "a", "a/b", "a/b/c", "a/d", "a/empty", "z"]
    );
    assert_eq!(collector.get("a/b/c").unwrap().content, Content::File(2));
    assert_eq!(collector.get("a/empty").unwrap().content, Content::Directory);
}

#[test]
fn test_consumer_receives_walker_path_and_name() {
    let mut seen = Vec::new();
    let mut visitor = PathTrackingVisitor::new(
        |path: &Path, name: &str, rel: RelativePath<'_>, _: Content<u64>| {
            seen.push((path.to_path_buf(), name.to_string(), rel.to_path_buf()));
        },
    );
    walk(&sample_tree(), Path::new("/base"), &mut visitor);
    visitor.finish().unwrap();

    let (path, name, rel) = &seen[3];
    assert_eq!(path, &PathBuf::from("/base/root/a/b/c"));
    assert_eq!(name, "c");
    assert_eq!(rel, &PathBuf::from("a/b/c"));
}

#[test]
fn test_first_enter_is_never_reported() {
    let mut calls = 0;
    let mut visitor = PathTrackingVisitor::<u64, _>::new(
        |_: &Path, _: &str, _: RelativePath<'_>, _: Content<u64>| calls += 1,
    );
    visitor.enter_directory(Path::new("/anything"), "anything");
    visitor.enter_directory(Path::new("/anything/child"), "child");
    visitor.exit_directory();
    visitor.exit_directory();
    visitor.finish().unwrap();
    assert_eq!(calls, 1);
}

#[test]
fn test_replay_is_deterministic() {
    let record = || {
        let mut visitor = PathTrackingVisitor::new(SnapshotCollector::<u64>::new());
        walk(&sample_tree(), Path::new("/"), &mut visitor);
        visitor.finish().unwrap().into_entries()
    };
    assert_eq!(record(), record());
}

#[test]
fn test_unbalanced_walker_is_tolerated_then_reported() {
    let mut visitor = PathTrackingVisitor::new(EntryCounter::new());
    HierarchicalVisitor::<u64>::enter_directory(&mut visitor, Path::new("/r"), "r");
    HierarchicalVisitor::<u64>::visit_entry(&mut visitor, Path::new("/r/f"), "f", 1);
    HierarchicalVisitor::<u64>::exit_directory(&mut visitor);
    HierarchicalVisitor::<u64>::exit_directory(&mut visitor);
    HierarchicalVisitor::<u64>::exit_directory(&mut visitor);

    assert_eq!(visitor.depth(), 0);
    assert_eq!(visitor.consumer().files, 1);
    assert_eq!(visitor.unbalanced_exits(), 2);
    assert_eq!(
        visitor.finish().unwrap_err(),
        VisitError::UnbalancedExit { count: 2 }
    );
}

#[test]
fn test_file_snapshot_content_passes_through() {
    let snapshot = FileSnapshot::new(5, SystemTime::UNIX_EPOCH).with_hash(ContentHash::new([7; 32]));
    let mut visitor = PathTrackingVisitor::new(SnapshotCollector::<FileSnapshot>::new());
    visitor.enter_directory(Path::new("/r"), "r");
    visitor.visit_entry(Path::new("/r/f"), "f", snapshot.clone());
    visitor.exit_directory();

    let collector = visitor.finish().unwrap();
    assert_eq!(collector.get("f").unwrap().content.snapshot(), Some(&snapshot));
}

#[test]
fn test_mirror_entry_serializes() {
    let mut visitor = PathTrackingVisitor::new(SnapshotCollector::<u64>::new());
    walk(&sample_tree(), Path::new("/"), &mut visitor);
    let entries = visitor.finish().unwrap().into_entries();

    let json = serde_json::to_value(&entries[1]).unwrap();
    assert_eq!(json["relative_path"], serde_json::json!(["a"]));
    assert_eq!(json["content"]["type"], "directory");

    let json = serde_json::to_value(&entries[3]).unwrap();
    assert_eq!(json["content"]["type"], "file");
    assert_eq!(json["content"]["snapshot"], 2);
}

fn builds() -> (Build, IndexMap<String, Build>) {
    let current = Build::new("app").with_project("core").with_project("core:model");
    let mut included = IndexMap::new();
    included.insert(
        "tools".to_string(),
        Build::new("tools").with_project("lint"),
    );
    (current, included)
}

#[test]
fn test_find_project_relative_to_base() {
    let (current, included) = builds();
    let base = current.project(":core").unwrap();
    let finder = ProjectFinder::new(&included, &current, base);

    assert_eq!(finder.find_project("model").unwrap().path, ":core:model");
    assert_eq!(finder.find_project(":core").unwrap().path, ":core");
    assert!(finder.find_project("missing").is_none());
}

#[test]
fn test_get_or_fail_project() {
    let (current, included) = builds();
    let finder = ProjectFinder::new(&included, &current, current.root_project());

    assert_eq!(finder.get_or_fail_project("core").unwrap().path, ":core");
    assert_eq!(
        finder.get_or_fail_project("nope").unwrap_err(),
        ProjectError::NotFound {
            path: ":nope".to_string()
        }
    );
}

#[test]
fn test_find_project_in_other_build() {
    let (current, included) = builds();
    let base = current.project(":core").unwrap();
    let finder = ProjectFinder::new(&included, &current, base);

    let lint = finder
        .find_project_in(&BuildId::Included("tools".to_string()), "lint")
        .unwrap();
    assert_eq!(lint.path, ":lint");
    assert_eq!(lint.build, "tools");

    assert_eq!(
        finder.find_project_in(&BuildId::Current, "model").unwrap().path,
        ":core:model"
    );
    assert!(finder
        .find_project_in(&BuildId::Included("unknown".to_string()), "lint")
        .is_none());
    assert!(included.included_build("tools").is_some());
}

#[test]
fn test_build_round_trips_through_json() {
    let (current, _) = builds();
    let json = serde_json::to_value(&current).unwrap();
    assert_eq!(json["name"], "app");
    assert_eq!(json["projects"][":core:model"]["build"], "app");

    let restored: Build = serde_json::from_value(json).unwrap();
    assert_eq!(restored.root_project().path, ":");
    assert_eq!(
        restored.projects().map(|p| p.path.as_str()).collect::<Vec<_>>(),
        vec![":", ":core", ":core:model"]
    );
}
