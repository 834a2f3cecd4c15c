use super::*;

fn card_component() -> Component {
    Component::new("card", "Card").with_slot(
        "children",
        vec![TplNode::tag(
            "div",
            vec![
                TplNode::instance("button"),
                TplNode::Text {
                    text: "hello".to_string(),
                },
                TplNode::Instance {
                    component: "icon".to_string(),
                    children: vec![TplNode::instance("badge")],
                },
            ],
        )],
    )
}

#[test]
fn test_default_slot_components_in_document_order() {
    let card = card_component();
    assert_eq!(card.default_slot_components(), vec!["button", "icon", "badge"]);
}

#[test]
fn test_frame_components_are_not_reusable() {
    assert!(Component::new("a", "A").is_reusable());
    assert!(Component::new("p", "Page").with_kind(ComponentKind::Page).is_reusable());
    assert!(!Component::new("f", "Frame").with_kind(ComponentKind::Frame).is_reusable());
}

#[test]
fn test_importable_assets_cover_every_kind() {
    let site = Site::new("site")
        .with_component(Component::new("c1", "Button"))
        .with_mixin("m1", "Shadow")
        .with_style_token("t1", "primary", "#000")
        .with_theme("th1", "Default")
        .with_image_asset("i1", "logo", ImageAssetKind::Icon)
        .with_variant_group("g1", "Theme");

    let assets: Vec<AssetRef> = site.importable_assets().collect();
    assert_eq!(
        assets,
        vec![
            AssetRef::new(AssetKind::Component, "c1"),
            AssetRef::new(AssetKind::Mixin, "m1"),
            AssetRef::new(AssetKind::StyleToken, "t1"),
            AssetRef::new(AssetKind::Theme, "th1"),
            AssetRef::new(AssetKind::ImageAsset, "i1"),
            AssetRef::new(AssetKind::VariantGroup, "g1"),
        ]
    );
}

#[test]
fn test_importable_assets_exclude_dependency_assets() {
    let dep = Arc::new(ProjectDependency::new(
        "pkg-b",
        "1.0",
        "B",
        "proj-b",
        Site::new("site-b").with_component(Component::new("b1", "B1")),
    ));
    let site = Site::new("site-a")
        .with_component(Component::new("a1", "A1"))
        .with_dependency(dep);

    let assets: Vec<AssetRef> = site.importable_assets().collect();
    assert_eq!(assets, vec![AssetRef::component("a1")]);
}

#[test]
fn test_requires_hostless() {
    let dep = ProjectDependency::new(
        "pkg-slick",
        "2.0",
        "react-slick",
        "proj-slick",
        Site::new("site-slick").with_hostless("react-slick", &["jquery", "slick-carousel"]),
    );
    assert!(dep.is_hostless());
    assert!(dep.requires_hostless("jquery"));
    assert!(!dep.requires_hostless("lodash"));
    assert_eq!(dep.to_string(), "react-slick@2.0");
}

#[test]
fn test_site_deserializes_camel_case_with_defaults() {
    let json = r#"{
        "uuid": "site-x",
        "components": [
            {
                "uuid": "c1",
                "name": "Card",
                "slots": [
                    {
                        "name": "children",
                        "defaultContents": [{ "type": "instance", "component": "c2" }]
                    }
                ]
            }
        ],
        "projectDependencies": [
            {
                "pkgId": "pkg-y",
                "version": "3.1",
                "name": "Y",
                "projectId": "proj-y",
                "site": { "uuid": "site-y", "hostlessPackageInfo": { "name": "y" } }
            }
        ],
        "defaultComponents": { "button": "c1" }
    }"#;

    let site: Site = serde_json::from_str(json).unwrap();
    assert_eq!(site.components[0].kind, ComponentKind::Plain);
    assert_eq!(site.components[0].default_slot_components(), vec!["c2"]);
    assert_eq!(site.project_dependencies[0].version, "3.1");
    assert!(site.project_dependencies[0].is_hostless());
    assert_eq!(site.default_components.get("button").map(String::as_str), Some("c1"));
    assert!(site.direct_dependency("pkg-y").is_some());
}
