//! Dependency trees shared by the workflow tests
//!
//! Built on the `projdeps_lib::testing` builders: package `x` belongs to
//! project `proj-x`.

use projdeps_lib::model::{Component, ImageAssetKind, ProjectDependency, Site, TplNode};
use projdeps_lib::testing::{dep_with_site, hostless_dep, leaf};
use std::sync::Arc;

/// `ds@2` exposing a `Card` whose default slot renders `icons@1`'s `Icon`
///
/// Also pulls in `tokens@1` as a plain transitive dependency.
pub fn design_system() -> Arc<ProjectDependency> {
    let icons = dep_with_site(
        "icons",
        "1",
        Site::new("site-icons")
            .with_component(Component::new("icon", "Icon"))
            .with_image_asset("icon-sprite", "Sprite", ImageAssetKind::Picture),
    );
    let tokens = dep_with_site(
        "tokens",
        "1",
        Site::new("site-tokens").with_style_token("brand", "Brand", "#0af"),
    );

    dep_with_site(
        "ds",
        "2",
        Site::new("site-ds")
            .with_component(
                Component::new("card", "Card")
                    .with_slot("icon", vec![TplNode::tag("div", vec![TplNode::instance("icon")])]),
            )
            .with_component(Component::new("button", "Button"))
            .with_default_component("button", "button")
            .with_global_context("ds-theme", "card")
            .with_dependency(icons)
            .with_dependency(tokens),
    )
}

/// A published site that pins `tokens` at `version`
pub fn marketing_site(version: &str) -> Arc<ProjectDependency> {
    dep_with_site(
        "marketing",
        "5",
        Site::new("site-marketing")
            .with_mixin("hero", "Hero")
            .with_dependency(leaf("tokens", version)),
    )
}

/// Hostless `slick` requiring hostless `jquery`
pub fn hostless_pair() -> (Arc<ProjectDependency>, Arc<ProjectDependency>) {
    let jquery = hostless_dep("jquery", "3", "jquery", &[]);
    let slick = hostless_dep("slick", "1", "slick", &["jquery"]);
    (jquery, slick)
}
