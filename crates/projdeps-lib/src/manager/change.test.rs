use super::*;
use crate::model::AssetRef;
use crate::model::Component;
use crate::testing::{dep_with_site, host, leaf};

#[test]
fn test_nothing_applied_before_commit() {
    let project = host("host", &[leaf("a", "1")]);
    let mut change = ProjectChange::begin(&project.site);
    change.push_direct(leaf("b", "1"));
    change.remove_direct("a");

    assert_eq!(project.site.project_dependencies.len(), 1);
    assert_eq!(project.site.project_dependencies[0].pkg_id, "a");
    drop(change);
}

#[test]
fn test_commit_updates_site_store_and_index() {
    let mut project = host("host", &[]);
    let mut store = DependencyGraphStore::new();
    let mut index = AssetOwnershipIndex::new();
    let b = dep_with_site(
        "b",
        "1",
        Site::new("site-b").with_component(Component::new("btn", "Button")),
    );

    let mut change = ProjectChange::begin(&project.site);
    change.push_direct(Arc::clone(&b));
    change.default_components_mut().insert("button".into(), "btn".into());
    let summary = change.commit(&mut project.site, &mut store, &mut index);

    assert_eq!(summary.tracked, vec!["b"]);
    assert_eq!(summary.indexed_assets, 1);
    assert!(store.contains("b"));
    assert_eq!(project.site.project_dependencies.len(), 1);
    assert_eq!(project.site.default_components["button"], "btn");
    assert!(Arc::ptr_eq(
        &index.owner_of(&AssetRef::component("btn")).unwrap(),
        &b
    ));
}

#[test]
fn test_replace_keeps_position_and_tracks_new_model() {
    let old_b = leaf("b", "1");
    let mut project = host("host", &[leaf("a", "1"), Arc::clone(&old_b), leaf("c", "1")]);
    let mut store = DependencyGraphStore::new();
    for d in &project.site.project_dependencies {
        store.track(Arc::clone(d));
    }
    let mut index = AssetOwnershipIndex::new();

    let mut change = ProjectChange::begin(&project.site);
    let replaced = change.replace_direct(leaf("b", "2")).unwrap();
    assert!(Arc::ptr_eq(&replaced, &old_b));
    let summary = change.commit(&mut project.site, &mut store, &mut index);

    assert!(summary.untracked.is_empty());
    assert_eq!(project.site.project_dependencies[1].version, "2");
    assert_eq!(store.get("b").unwrap().model.version, "2");
    assert_eq!(store.len(), 3);
}

#[test]
fn test_push_then_remove_leaves_package_untracked() {
    let mut project = host("host", &[]);
    let mut store = DependencyGraphStore::new();
    let mut index = AssetOwnershipIndex::new();

    let mut change = ProjectChange::begin(&project.site);
    change.push_direct(leaf("x", "1"));
    assert!(change.is_direct("x"));
    change.remove_direct("x");
    assert!(!change.is_direct("x"));
    change.commit(&mut project.site, &mut store, &mut index);

    assert!(store.is_empty());
    assert!(project.site.project_dependencies.is_empty());
}

#[test]
fn test_missing_direct_dependency_is_reported() {
    let project = host("host", &[]);
    let mut change = ProjectChange::begin(&project.site);
    assert!(change.remove_direct("nope").is_none());
    assert!(change.replace_direct(leaf("nope", "1")).is_none());
}

fn shared_card() -> Arc<ProjectDependency> {
    dep_with_site(
        "c",
        "1",
        Site::new("site-c").with_component(Component::new("c-card", "Card")),
    )
}

fn diamond() -> (crate::model::HostProject, DependencyGraphStore, AssetOwnershipIndex) {
    let a = dep_with_site("a", "1", Site::new("site-a").with_dependency(shared_card()));
    let r = dep_with_site("r", "1", Site::new("site-r").with_dependency(shared_card()));
    let project = host("host", &[a, r]);
    let mut store = DependencyGraphStore::new();
    let mut index = AssetOwnershipIndex::new();
    for d in &project.site.project_dependencies {
        index.rebuild_for(d);
        store.track(Arc::clone(d));
    }
    (project, store, index)
}

#[test]
fn test_remove_reindexes_package_shared_with_survivor() {
    let (mut project, mut store, mut index) = diamond();

    let mut change = ProjectChange::begin(&project.site);
    change.remove_direct("r");
    let summary = change.commit(&mut project.site, &mut store, &mut index);

    assert_eq!(summary.untracked, vec!["r"]);
    assert_eq!(summary.indexed_assets, 1);
    let owner = index.owner_of(&AssetRef::component("c-card")).unwrap();
    assert!(Arc::ptr_eq(&owner, &project.site.project_dependencies[0].site.project_dependencies[0]));
}

#[test]
fn test_replace_reindexes_package_shared_with_survivor() {
    let (mut project, mut store, mut index) = diamond();

    let mut change = ProjectChange::begin(&project.site);
    change.replace_direct(leaf("r", "2"));
    change.commit(&mut project.site, &mut store, &mut index);

    let owner = index.owner_of(&AssetRef::component("c-card")).unwrap();
    assert_eq!(owner.pkg_id, "c");
}
