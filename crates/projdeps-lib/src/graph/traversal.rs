//! Breadth-first traversal of nested dependency sites

use crate::model::{ProjectDependency, Site};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::trace;

/// Where a traversal starts
///
/// A `Site` root contributes only its direct dependencies; dependency roots
/// are themselves part of the walk.
#[derive(Debug, Clone, Copy)]
pub enum TraversalRoot<'a> {
    Site(&'a Site),
    Dependency(&'a Arc<ProjectDependency>),
    Dependencies(&'a [Arc<ProjectDependency>]),
}

impl TraversalRoot<'_> {
    /// Entries the walk begins with
    pub fn seeds(&self) -> Vec<Arc<ProjectDependency>> {
        match self {
            TraversalRoot::Site(site) => site.project_dependencies.clone(),
            TraversalRoot::Dependency(dep) => vec![Arc::clone(dep)],
            TraversalRoot::Dependencies(deps) => deps.to_vec(),
        }
    }
}

impl<'a> From<&'a Site> for TraversalRoot<'a> {
    fn from(site: &'a Site) -> Self {
        TraversalRoot::Site(site)
    }
}

impl<'a> From<&'a Arc<ProjectDependency>> for TraversalRoot<'a> {
    fn from(dep: &'a Arc<ProjectDependency>) -> Self {
        TraversalRoot::Dependency(dep)
    }
}

impl<'a> From<&'a [Arc<ProjectDependency>]> for TraversalRoot<'a> {
    fn from(deps: &'a [Arc<ProjectDependency>]) -> Self {
        TraversalRoot::Dependencies(deps)
    }
}

impl<'a> From<&'a Vec<Arc<ProjectDependency>>> for TraversalRoot<'a> {
    fn from(deps: &'a Vec<Arc<ProjectDependency>>) -> Self {
        TraversalRoot::Dependencies(deps.as_slice())
    }
}

/// Lazy breadth-first sequence of dependencies
///
/// Packages reachable along several paths are yielded once per path, so the
/// walk grows exponentially on trees with many nested diamonds. Use
/// [`walk_unique`] when each package is needed only once.
#[derive(Debug)]
pub struct Closure {
    queue: VecDeque<Arc<ProjectDependency>>,
}

impl Iterator for Closure {
    type Item = Arc<ProjectDependency>;

    fn next(&mut self) -> Option<Self::Item> {
        let dep = self.queue.pop_front()?;
        self.queue
            .extend(dep.site.project_dependencies.iter().cloned());
        Some(dep)
    }
}

/// Walk every dependency reachable from `root`, breadth-first
pub fn closure<'a>(root: impl Into<TraversalRoot<'a>>) -> Closure {
    Closure {
        queue: root.into().seeds().into(),
    }
}

/// Breadth-first walk that yields each package id once (first occurrence wins)
///
/// Children of an already-seen package are not expanded again, so the cost
/// stays linear in the number of distinct packages.
pub fn walk_unique<'a>(root: impl Into<TraversalRoot<'a>>) -> Vec<Arc<ProjectDependency>> {
    let mut seen = HashSet::new();
    let mut queue: VecDeque<Arc<ProjectDependency>> = root.into().seeds().into();
    let mut result = Vec::new();

    while let Some(dep) = queue.pop_front() {
        if !seen.insert(dep.pkg_id.clone()) {
            trace!("Skipping already visited package: {}", dep.pkg_id);
            continue;
        }
        queue.extend(dep.site.project_dependencies.iter().cloned());
        result.push(dep);
    }

    result
}

#[cfg(test)]
mod tests {
    include!("traversal.test.rs");
}
