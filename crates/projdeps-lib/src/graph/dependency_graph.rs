//! Package-level dependency graph of a materialized tree
//!
//! Collapses a nested dependency tree into one node per package id and one
//! edge per "depends on" relation. Used for the structural acyclicity check
//! of import candidates and for "why is this package here" queries.

use super::traversal::{TraversalRoot, walk_unique};
use crate::model::ProjectDependency;
use petgraph::Direction;
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::trace;

/// A package in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    pub pkg_id: String,
    pub name: String,
    pub version: String,
    pub project_id: String,
}

impl DependencyNode {
    pub fn new(pkg_id: &str, name: &str, version: &str, project_id: &str) -> Self {
        Self {
            pkg_id: pkg_id.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            project_id: project_id.to_string(),
        }
    }
}

impl From<&ProjectDependency> for DependencyNode {
    fn from(dep: &ProjectDependency) -> Self {
        Self::new(&dep.pkg_id, &dep.name, &dep.version, &dep.project_id)
    }
}

impl fmt::Display for DependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.name, self.version, self.pkg_id)
    }
}

/// Directed graph of packages
///
/// Edges run from a dependency to its dependent, so a topological order lists
/// dependencies before the packages that import them.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<DependencyNode, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph of everything reachable from `root`
    ///
    /// Each package's children are read from its first materialization, which
    /// is also what closes a loop back onto an earlier package.
    pub fn from_root<'a>(root: impl Into<TraversalRoot<'a>>) -> Self {
        let mut graph = Self::new();
        for dep in walk_unique(root) {
            graph.add_node(DependencyNode::from(dep.as_ref()));
            for child in &dep.site.project_dependencies {
                graph.add_node(DependencyNode::from(child.as_ref()));
                graph.add_dependency(&dep.pkg_id, &child.pkg_id);
            }
        }
        graph
    }

    /// Add a package (idempotent)
    pub fn add_node(&mut self, node: DependencyNode) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&node.pkg_id) {
            trace!("Node already exists: {}", node.pkg_id);
            return idx;
        }

        let pkg_id = node.pkg_id.clone();
        let idx = self.graph.add_node(node);
        self.node_map.insert(pkg_id, idx);
        idx
    }

    /// Record that `dependent_id` depends on `dependency_id`
    ///
    /// Returns false when either package is unknown or the edge already exists.
    pub fn add_dependency(&mut self, dependent_id: &str, dependency_id: &str) -> bool {
        let (Some(&dependent), Some(&dependency)) = (
            self.node_map.get(dependent_id),
            self.node_map.get(dependency_id),
        ) else {
            return false;
        };

        if self.graph.contains_edge(dependency, dependent) {
            return false;
        }
        self.graph.add_edge(dependency, dependent, ());
        true
    }

    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Package ids along one cycle, if the graph has any
    ///
    /// The path follows dependency-to-dependent edges, starting at the package
    /// where the cycle was entered.
    pub fn detect_cycle(&self) -> Option<Vec<String>> {
        if !self.has_cycles() {
            return None;
        }

        let mut visited = HashSet::new();
        let mut stack = Vec::new();

        self.graph
            .node_indices()
            .find_map(|idx| self.dfs_cycle(idx, &mut visited, &mut stack))
    }

    fn dfs_cycle(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        stack: &mut Vec<NodeIndex>,
    ) -> Option<Vec<String>> {
        if !visited.insert(node) {
            return None;
        }
        stack.push(node);

        for neighbor in self.graph.neighbors(node) {
            if let Some(pos) = stack.iter().position(|&n| n == neighbor) {
                return Some(
                    stack[pos..]
                        .iter()
                        .map(|&idx| self.graph[idx].pkg_id.clone())
                        .collect(),
                );
            }
            if let Some(cycle) = self.dfs_cycle(neighbor, visited, stack) {
                return Some(cycle);
            }
        }

        stack.pop();
        None
    }

    /// Packages ordered so that dependencies precede their dependents
    ///
    /// Returns the cycle as `Err` when there is no such order.
    pub fn topological_order(&self) -> Result<Vec<DependencyNode>, Vec<String>> {
        toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|idx| self.graph[idx].clone()).collect())
            .map_err(|_| self.detect_cycle().unwrap_or_default())
    }

    /// Packages that `pkg_id` imports directly
    pub fn dependencies(&self, pkg_id: &str) -> Option<Vec<&DependencyNode>> {
        self.neighbors(pkg_id, Direction::Incoming)
    }

    /// Packages that import `pkg_id` directly
    pub fn dependents(&self, pkg_id: &str) -> Option<Vec<&DependencyNode>> {
        self.neighbors(pkg_id, Direction::Outgoing)
    }

    fn neighbors(&self, pkg_id: &str, direction: Direction) -> Option<Vec<&DependencyNode>> {
        let idx = self.node_map.get(pkg_id)?;
        let mut nodes: Vec<&DependencyNode> = self
            .graph
            .neighbors_directed(*idx, direction)
            .map(|n| &self.graph[n])
            .collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.pkg_id.cmp(&b.pkg_id)));
        Some(nodes)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, pkg_id: &str) -> bool {
        self.node_map.contains_key(pkg_id)
    }

    pub fn get_node(&self, pkg_id: &str) -> Option<&DependencyNode> {
        let idx = self.node_map.get(pkg_id)?;
        Some(&self.graph[*idx])
    }
}

#[cfg(test)]
mod tests {
    include!("dependency_graph.test.rs");
}
