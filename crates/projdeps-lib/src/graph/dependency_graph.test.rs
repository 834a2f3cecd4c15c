// Tests for the package-level dependency graph

use super::*;
use crate::testing::{dep, host, leaf};
use std::sync::Arc;

fn ids(nodes: &[&DependencyNode]) -> Vec<String> {
    nodes.iter().map(|n| n.pkg_id.clone()).collect()
}

// ============================================================================
// Basic Graph Operations
// ============================================================================

#[test]
fn test_new_graph_is_empty() {
    let graph = DependencyGraph::new();
    assert_eq!(graph.node_count(), 0);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_add_node_is_idempotent() {
    let mut graph = DependencyGraph::new();
    let first = graph.add_node(DependencyNode::new("a", "A", "1", "proj-a"));
    let second = graph.add_node(DependencyNode::new("a", "A", "1", "proj-a"));

    assert_eq!(first, second);
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.get_node("a").map(|n| n.name.as_str()), Some("A"));
}

#[test]
fn test_add_dependency_requires_known_nodes() {
    let mut graph = DependencyGraph::new();
    graph.add_node(DependencyNode::new("a", "A", "1", "proj-a"));

    assert!(!graph.add_dependency("a", "missing"));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_shared_dependency_gets_one_node() {
    let shared = leaf("shared", "1");
    let project = host(
        "host",
        &[dep("a", "1", &[Arc::clone(&shared)]), dep("b", "1", &[shared])],
    );
    let graph = DependencyGraph::from_root(&project.site);

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert!(!graph.has_cycles());
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_dependents_and_dependencies() {
    let shared = leaf("shared", "1");
    let project = host(
        "host",
        &[
            dep("b", "1", &[Arc::clone(&shared)]),
            dep("a", "1", &[shared, leaf("c", "1")]),
        ],
    );
    let graph = DependencyGraph::from_root(&project.site);

    assert_eq!(ids(&graph.dependents("shared").unwrap()), vec!["a", "b"]);
    assert_eq!(ids(&graph.dependencies("a").unwrap()), vec!["c", "shared"]);
    assert!(graph.dependents("a").unwrap().is_empty());
    assert!(graph.dependents("unknown").is_none());
}

#[test]
fn test_topological_order_puts_dependencies_first() {
    let a = dep("a", "1", &[dep("b", "1", &[leaf("c", "1")])]);
    let graph = DependencyGraph::from_root(&a);

    let order: Vec<String> = graph
        .topological_order()
        .unwrap()
        .into_iter()
        .map(|n| n.pkg_id)
        .collect();
    assert_eq!(order, vec!["c", "b", "a"]);
}

// ============================================================================
// Cycle Detection
// ============================================================================

#[test]
fn test_acyclic_tree_has_no_cycle() {
    let a = dep("a", "1", &[leaf("b", "1")]);
    let graph = DependencyGraph::from_root(&a);
    assert!(graph.detect_cycle().is_none());
}

#[test]
fn test_loop_back_to_root_is_a_cycle() {
    let b = dep("b", "1", &[leaf("a", "1")]);
    let a = dep("a", "1", &[b]);
    let graph = DependencyGraph::from_root(&a);

    assert!(graph.has_cycles());
    let mut cycle = graph.detect_cycle().unwrap();
    cycle.sort();
    assert_eq!(cycle, vec!["a", "b"]);
    assert!(graph.topological_order().is_err());
}

#[test]
fn test_three_node_cycle_is_reported_in_full() {
    let mut graph = DependencyGraph::new();
    for id in ["x", "y", "z"] {
        graph.add_node(DependencyNode::new(id, id, "1", id));
    }
    graph.add_dependency("x", "y");
    graph.add_dependency("y", "z");
    graph.add_dependency("z", "x");

    let cycle = graph.detect_cycle().unwrap();
    assert_eq!(cycle.len(), 3);
}
