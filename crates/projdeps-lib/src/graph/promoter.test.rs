use super::*;
use crate::model::{ComponentKind, Site, TplNode};
use crate::testing::{dep, dep_with_site, hostless_dep, leaf};

fn pkg_ids(deps: &[Arc<ProjectDependency>]) -> Vec<&str> {
    deps.iter().map(|d| d.pkg_id.as_str()).collect()
}

/// `b` imports `c`; b's `Card` renders c's `Badge` in its default slot
fn slot_tree(card_kind: ComponentKind) -> (Arc<ProjectDependency>, Arc<ProjectDependency>) {
    let c = dep_with_site(
        "c",
        "1",
        Site::new("site-c").with_component(Component::new("badge", "Badge")),
    );
    let card = Component::new("card", "Card")
        .with_kind(card_kind)
        .with_slot("children", vec![TplNode::instance("badge")]);
    let b = dep_with_site(
        "b",
        "1",
        Site::new("site-b")
            .with_component(card)
            .with_dependency(Arc::clone(&c)),
    );
    (b, c)
}

#[test]
fn test_default_slot_owner_is_promoted() {
    let (b, _c) = slot_tree(ComponentKind::Plain);
    let promoter = TransitivePromoter::new(&[Arc::clone(&b)]);

    assert_eq!(pkg_ids(&promoter.promote(&b)), vec!["c"]);
}

#[test]
fn test_frame_components_do_not_promote() {
    let (b, _c) = slot_tree(ComponentKind::Frame);
    let promoter = TransitivePromoter::new(&[Arc::clone(&b)]);

    assert!(promoter.promote(&b).is_empty());
}

#[test]
fn test_already_direct_owner_is_not_promoted() {
    let (b, c) = slot_tree(ComponentKind::Plain);
    let promoter = TransitivePromoter::new(&[Arc::clone(&b), c]);

    assert!(promoter.from_default_slots(&b.site.components).is_empty());
}

#[test]
fn test_components_owned_by_the_import_itself_are_ignored() {
    let card = Component::new("card", "Card").with_slot("children", vec![TplNode::instance("own")]);
    let b = dep_with_site(
        "b",
        "1",
        Site::new("site-b")
            .with_component(card)
            .with_component(Component::new("own", "Own")),
    );
    let promoter = TransitivePromoter::new(&[Arc::clone(&b)]);

    assert!(promoter.promote(&b).is_empty());
}

#[test]
fn test_transitive_hostless_packages_are_promoted() {
    let jquery = hostless_dep("jquery", "3", "jquery", &[]);
    let slick = dep("slick", "1", &[jquery]);
    let direct_hostless = hostless_dep("antd", "5", "antd", &[]);
    let promoter = TransitivePromoter::new(&[slick, direct_hostless]);

    assert_eq!(pkg_ids(&promoter.hostless_packages()), vec!["jquery"]);
}

#[test]
fn test_promotions_are_deduplicated() {
    let c = dep_with_site(
        "c",
        "1",
        Site::new("site-c")
            .with_component(Component::new("badge", "Badge"))
            .with_hostless("c-lib", &[]),
    );
    let card = Component::new("card", "Card").with_slot(
        "children",
        vec![TplNode::instance("badge"), TplNode::instance("badge")],
    );
    let b = dep_with_site(
        "b",
        "1",
        Site::new("site-b").with_component(card).with_dependency(c),
    );
    let promoter = TransitivePromoter::new(&[Arc::clone(&b), leaf("other", "1")]);

    assert_eq!(pkg_ids(&promoter.promote(&b)), vec!["c"]);
}
