use super::*;
use crate::model::Site;
use crate::testing::leaf;

fn named(pkg_id: &str, name: &str) -> Arc<ProjectDependency> {
    Arc::new(ProjectDependency::new(
        pkg_id,
        "1",
        name,
        format!("proj-{}", pkg_id),
        Site::new(format!("site-{}", pkg_id)),
    ))
}

fn meta(pkg_id: &str, version: &str) -> VersionMeta {
    VersionMeta {
        pkg_id: pkg_id.to_string(),
        version: version.to_string(),
        description: None,
        published_at: None,
        tags: Vec::new(),
    }
}

#[test]
fn test_list_direct_sorted_by_name() {
    let mut store = DependencyGraphStore::new();
    store.track(named("p3", "Zebra"));
    store.track(named("p1", "Alpha"));
    store.track(named("p2", "Alpha"));

    let order: Vec<&str> = store.list_direct().iter().map(|r| r.pkg_id()).collect();
    assert_eq!(order, vec!["p1", "p2", "p3"]);
}

#[test]
fn test_track_overwrites_and_clears_meta() {
    let mut store = DependencyGraphStore::new();
    store.track(leaf("a", "1"));
    assert!(store.set_version_meta("a", meta("a", "2")));
    assert!(store.get("a").unwrap().has_update());

    store.track(leaf("a", "2"));
    let record = store.get("a").unwrap();
    assert_eq!(record.model.version, "2");
    assert!(record.latest_version_meta.is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_untrack_removes_record() {
    let mut store = DependencyGraphStore::new();
    store.track(leaf("a", "1"));

    assert!(store.untrack("a").is_some());
    assert!(!store.contains("a"));
    assert!(store.untrack("a").is_none());
    assert!(store.is_empty());
}

#[test]
fn test_meta_for_untracked_package_is_ignored() {
    let mut store = DependencyGraphStore::new();
    store.track(leaf("a", "1"));
    let before = store.clone();

    assert!(!store.set_version_meta("gone", meta("gone", "1")));
    assert_eq!(store, before);
}

#[test]
fn test_same_version_meta_is_not_an_update() {
    let mut store = DependencyGraphStore::new();
    store.track(leaf("a", "1"));
    store.set_version_meta("a", meta("a", "1"));
    assert!(!store.get("a").unwrap().has_update());
}
