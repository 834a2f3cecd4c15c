//! Property tests for single-version closures
//!
//! Random acyclic package trees always resolve to one version per package;
//! two versions of one package anywhere in a closure never do.

use projdeps_lib::graph::resolver::{build_map, check_compatible};
use projdeps_lib::graph::{DependencyError, DependencyGraph};
use projdeps_lib::model::ProjectDependency;
use projdeps_lib::registry::MockRegistryClient;
use projdeps_lib::testing::{dep, host, leaf};
use projdeps_lib::DependencyManager;
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Children of package `i` are drawn from packages `i+1..n`, so the tree is acyclic
fn dag_strategy() -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<u8>)> {
    (1usize..8).prop_flat_map(|n| {
        (
            prop::collection::vec(prop::collection::vec(any::<Index>(), 0..3), n),
            prop::collection::vec(0u8..3, n),
        )
            .prop_map(move |(picks, versions)| {
                let children = picks
                    .iter()
                    .enumerate()
                    .map(|(i, picks)| {
                        let later = n - i - 1;
                        if later == 0 {
                            return Vec::new();
                        }
                        let mut children: Vec<usize> =
                            picks.iter().map(|p| i + 1 + p.index(later)).collect();
                        children.sort_unstable();
                        children.dedup();
                        children
                    })
                    .collect();
                (children, versions)
            })
    })
}

fn materialize(children: &[Vec<usize>], versions: &[u8]) -> Arc<ProjectDependency> {
    let mut built: BTreeMap<usize, Arc<ProjectDependency>> = BTreeMap::new();
    for i in (0..children.len()).rev() {
        let kids: Vec<_> = children[i].iter().map(|c| Arc::clone(&built[c])).collect();
        built.insert(i, dep(&format!("p{}", i), &versions[i].to_string(), &kids));
    }
    Arc::clone(&built[&0])
}

fn reachable(children: &[Vec<usize>], from: usize, out: &mut BTreeSet<usize>) {
    for &child in &children[from] {
        if out.insert(child) {
            reachable(children, child, out);
        }
    }
}

fn is_shared_conflict<T>(result: &Result<T, DependencyError>) -> bool {
    matches!(
        result,
        Err(DependencyError::VersionConflict { pkg_id, .. }) if pkg_id == "shared"
    )
}

proptest! {
    #[test]
    fn acyclic_trees_resolve_one_version_per_package((children, versions) in dag_strategy()) {
        let root = materialize(&children, &versions);
        let map = build_map(&root.site).unwrap();

        let mut expected = BTreeSet::new();
        reachable(&children, 0, &mut expected);
        let expected_ids: BTreeSet<String> = expected.iter().map(|i| format!("p{}", i)).collect();
        let resolved_ids: BTreeSet<String> = map.keys().cloned().collect();
        prop_assert_eq!(resolved_ids, expected_ids);

        for i in expected {
            prop_assert_eq!(&map[&format!("p{}", i)].version, &versions[i].to_string());
        }
    }

    #[test]
    fn topological_order_lists_dependencies_first((children, versions) in dag_strategy()) {
        let root = materialize(&children, &versions);
        let graph = DependencyGraph::from_root(&root);
        prop_assert!(!graph.has_cycles());

        let order: Vec<String> = graph
            .topological_order()
            .unwrap()
            .into_iter()
            .map(|node| node.pkg_id)
            .collect();
        let position = |id: &str| order.iter().position(|p| p == id).unwrap();
        for (i, kids) in children.iter().enumerate() {
            if !graph.contains(&format!("p{}", i)) {
                continue;
            }
            for child in kids {
                let child_pos = position(&format!("p{}", child));
                let parent_pos = position(&format!("p{}", i));
                prop_assert!(child_pos < parent_pos);
            }
        }
    }

    #[test]
    fn two_versions_of_a_package_never_resolve(
        (children, versions) in dag_strategy(),
        v1 in 0u8..4,
        bump in 1u8..4,
    ) {
        let v2 = v1 + bump;
        let left = dep("left", "1", &[leaf("shared", &v1.to_string())]);
        let right = dep("right", "1", &[leaf("shared", &v2.to_string())]);
        let root = dep("root", "1", &[materialize(&children, &versions), left.clone(), right.clone()]);

        prop_assert!(is_shared_conflict(&build_map(&root.site)));

        let left_map = build_map(&left).unwrap();
        let right_map = build_map(&right).unwrap();
        prop_assert!(is_shared_conflict(&check_compatible(&left_map, &right_map)));
    }

    #[test]
    fn sync_is_idempotent(versions in prop::collection::vec(0u8..3, 0..6)) {
        let deps: Vec<_> = versions
            .iter()
            .enumerate()
            .map(|(i, v)| leaf(&format!("d{}", i), &v.to_string()))
            .collect();
        let mut manager = DependencyManager::new(host("site", &[]), Arc::new(MockRegistryClient::new()));

        let first = manager.sync_direct_deps(deps.clone());
        prop_assert_eq!(first.updated.len(), deps.len());
        let revision = manager.revision();

        prop_assert!(manager.sync_direct_deps(deps).is_empty());
        prop_assert_eq!(manager.revision(), revision);
    }
}
