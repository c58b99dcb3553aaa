//! Project lookup across the current build and included builds.
//!
//! Project paths use `:` as separator; `:` alone is the root project of a
//! build, `:app:core` is absolute, and `core` is relative to a base project.
//! This is plain forwarding: nothing here walks directories.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ProjectError;

const SEPARATOR: char = ':';

/// Identifies which build a project lookup targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildId {
    /// The build performing the lookup.
    Current,
    /// An included build, by name.
    Included(String),
}

impl BuildId {
    /// Check if this refers to the current build.
    pub fn is_current(&self) -> bool {
        matches!(self, BuildId::Current)
    }
}

/// A project registered in a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Absolute project path, e.g. `:app:core`.
    pub path: String,
    /// Name of the build the project belongs to.
    pub build: String,
}

impl Project {
    /// Last path segment, or the build name for the root project.
    pub fn name(&self) -> &str {
        match self.path.rsplit(SEPARATOR).next() {
            Some(name) if !name.is_empty() => name,
            _ => &self.build,
        }
    }

    /// Check if this is the root project of its build.
    pub fn is_root(&self) -> bool {
        self.path == ":"
    }

    /// Resolve a path relative to this project.
    pub fn absolute_path(&self, path: &str) -> String {
        absolute_path(&self.path, path)
    }
}

/// A build and its projects, keyed by absolute path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    name: String,
    projects: IndexMap<String, Project>,
}

impl Build {
    /// Create a build containing only its root project.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut projects = IndexMap::new();
        projects.insert(
            ":".to_string(),
            Project {
                path: ":".to_string(),
                build: name.clone(),
            },
        );
        Self { name, projects }
    }

    /// Register a project, resolving `path` against the root.
    pub fn with_project(mut self, path: &str) -> Self {
        let path = absolute_path(":", path);
        self.projects.insert(
            path.clone(),
            Project {
                path,
                build: self.name.clone(),
            },
        );
        self
    }

    /// Build name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The root project.
    pub fn root_project(&self) -> &Project {
        &self.projects[0]
    }

    /// Look up a project by absolute path.
    pub fn project(&self, absolute_path: &str) -> Option<&Project> {
        self.projects.get(absolute_path)
    }

    /// Iterate over projects in registration order, root first.
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }
}

/// Source of included builds.
pub trait BuildRegistry {
    /// Look up a configured included build by name.
    fn included_build(&self, name: &str) -> Option<&Build>;
}

impl BuildRegistry for IndexMap<String, Build> {
    fn included_build(&self, name: &str) -> Option<&Build> {
        self.get(name)
    }
}

/// Finds projects relative to a base project, redirecting lookups for other
/// builds to their root project.
pub struct ProjectFinder<'a, R> {
    registry: &'a R,
    current: &'a Build,
    base: &'a Project,
}

impl<'a, R: BuildRegistry> ProjectFinder<'a, R> {
    /// Create a finder resolving relative paths against `base`.
    pub fn new(registry: &'a R, current: &'a Build, base: &'a Project) -> Self {
        Self {
            registry,
            current,
            base,
        }
    }

    /// Find a project in the current build, failing if it does not exist.
    pub fn get_or_fail_project(&self, path: &str) -> Result<&'a Project, ProjectError> {
        self.find_project(path).ok_or_else(|| ProjectError::NotFound {
            path: self.base.absolute_path(path),
        })
    }

    /// Find a project in the current build.
    pub fn find_project(&self, path: &str) -> Option<&'a Project> {
        self.current.project(&self.base.absolute_path(path))
    }

    /// Find a project in the given build. For builds other than the current
    /// one, `path` is resolved against that build's root project.
    pub fn find_project_in(&self, build: &BuildId, path: &str) -> Option<&'a Project> {
        match build {
            BuildId::Current => self.find_project(path),
            BuildId::Included(name) => {
                let Some(included) = self.registry.included_build(name) else {
                    tracing::debug!(build = %name, "included build not registered");
                    return None;
                };
                included.project(&included.root_project().absolute_path(path))
            }
        }
    }
}

fn absolute_path(base: &str, path: &str) -> String {
    if path.starts_with(SEPARATOR) {
        path.to_string()
    } else if base == ":" {
        format!(":{path}")
    } else {
        format!("{base}:{path}")
    }
}
