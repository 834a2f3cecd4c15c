use super::*;
use crate::testing::{dep, host, leaf};

fn pkg_ids(deps: impl IntoIterator<Item = Arc<ProjectDependency>>) -> Vec<String> {
    deps.into_iter().map(|d| d.pkg_id.clone()).collect()
}

#[test]
fn test_site_root_starts_at_direct_dependencies() {
    let c = leaf("c", "1");
    let a = dep("a", "1", &[c]);
    let b = leaf("b", "1");
    let project = host("host", &[a, b]);

    assert_eq!(pkg_ids(closure(&project.site)), vec!["a", "b", "c"]);
}

#[test]
fn test_dependency_root_includes_itself() {
    let a = dep("a", "1", &[leaf("b", "1"), leaf("c", "1")]);
    assert_eq!(pkg_ids(closure(&a)), vec!["a", "b", "c"]);
}

#[test]
fn test_closure_is_breadth_first() {
    let d = leaf("d", "1");
    let a = dep("a", "1", &[dep("c", "1", &[d])]);
    let b = leaf("b", "1");
    let roots = vec![a, b];

    assert_eq!(pkg_ids(closure(&roots)), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_closure_does_not_deduplicate() {
    let shared = leaf("shared", "1");
    let a = dep("a", "1", &[Arc::clone(&shared)]);
    let b = dep("b", "1", &[shared]);
    let roots = vec![a, b];

    assert_eq!(pkg_ids(closure(&roots)), vec!["a", "b", "shared", "shared"]);
}

#[test]
fn test_walk_unique_keeps_first_occurrence() {
    let shared = leaf("shared", "1");
    let a = dep("a", "1", &[Arc::clone(&shared)]);
    let b = dep("b", "1", &[shared, leaf("z", "1")]);
    let roots = vec![a, b];

    assert_eq!(pkg_ids(walk_unique(&roots)), vec!["a", "b", "shared", "z"]);
}

#[test]
fn test_walk_unique_terminates_on_looping_tree() {
    // a -> b -> a (the inner `a` is a different materialization of the same package)
    let inner_a = leaf("a", "1");
    let b = dep("b", "1", &[inner_a]);
    let a = dep("a", "1", &[b]);

    assert_eq!(pkg_ids(walk_unique(&a)), vec!["a", "b"]);
}

#[test]
fn test_empty_site_yields_nothing() {
    let project = host("host", &[]);
    assert_eq!(closure(&project.site).count(), 0);
    assert!(walk_unique(&project.site).is_empty());
}
