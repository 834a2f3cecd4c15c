use super::*;
use crate::model::{AssetKind, Component, ImageAssetKind, Site};
use crate::testing::dep_with_site;

fn library() -> Arc<ProjectDependency> {
    let tokens = dep_with_site(
        "tokens",
        "1",
        Site::new("site-tokens")
            .with_style_token("t-primary", "primary", "#0af")
            .with_theme("theme-dark", "Dark"),
    );
    dep_with_site(
        "ui",
        "2",
        Site::new("site-ui")
            .with_component(Component::new("button", "Button"))
            .with_mixin("m-shadow", "Shadow")
            .with_image_asset("icon-x", "Close", ImageAssetKind::Icon)
            .with_variant_group("vg-mode", "Mode")
            .with_dependency(tokens),
    )
}

fn owner_id(index: &AssetOwnershipIndex, asset: AssetRef) -> Option<String> {
    index.owner_of(&asset).map(|d| d.pkg_id.clone())
}

#[test]
fn test_rebuild_indexes_dependency_and_descendants() {
    let ui = library();
    let mut index = AssetOwnershipIndex::new();

    assert_eq!(index.rebuild_for(&ui), 6);
    assert_eq!(owner_id(&index, AssetRef::component("button")).as_deref(), Some("ui"));
    assert_eq!(
        owner_id(&index, AssetRef::new(AssetKind::VariantGroup, "vg-mode")).as_deref(),
        Some("ui")
    );
    assert_eq!(
        owner_id(&index, AssetRef::new(AssetKind::StyleToken, "t-primary")).as_deref(),
        Some("tokens")
    );
    assert_eq!(
        owner_id(&index, AssetRef::new(AssetKind::Theme, "theme-dark")).as_deref(),
        Some("tokens")
    );
}

#[test]
fn test_unknown_asset_has_no_owner() {
    let mut index = AssetOwnershipIndex::new();
    index.rebuild_for(&library());
    assert!(index.owner_of(&AssetRef::component("nope")).is_none());
}

#[test]
fn test_later_rebuild_overwrites_owner() {
    let old = dep_with_site(
        "ui",
        "1",
        Site::new("site-ui-1").with_component(Component::new("button", "Button")),
    );
    let new = dep_with_site(
        "ui",
        "2",
        Site::new("site-ui-2").with_component(Component::new("button", "Button")),
    );
    let mut index = AssetOwnershipIndex::new();
    index.rebuild_for(&old);
    index.rebuild_for(&new);

    let owner = index.owner_of(&AssetRef::component("button")).unwrap();
    assert_eq!(owner.version, "2");
    assert_eq!(index.len(), 1);
}

#[test]
fn test_dropped_dependency_reads_as_no_owner() {
    let mut index = AssetOwnershipIndex::new();
    {
        let ui = library();
        index.rebuild_for(&ui);
    }

    assert!(!index.is_empty());
    assert!(index.owner_of(&AssetRef::component("button")).is_none());
}

#[test]
fn test_rebuild_all_points_shared_package_at_last_copy() {
    let shared = || {
        dep_with_site(
            "shared",
            "1",
            Site::new("site-shared").with_component(Component::new("card", "Card")),
        )
    };
    let a = dep_with_site("a", "1", Site::new("site-a").with_dependency(shared()));
    let b = dep_with_site("b", "1", Site::new("site-b").with_dependency(shared()));
    let mut index = AssetOwnershipIndex::new();
    index.rebuild_for(&library());

    assert_eq!(index.rebuild_all(&[Arc::clone(&a), Arc::clone(&b)]), 2);
    assert_eq!(index.len(), 1);
    let owner = index.owner_of(&AssetRef::component("card")).unwrap();
    assert!(Arc::ptr_eq(&owner, &b.site.project_dependencies[0]));
}
