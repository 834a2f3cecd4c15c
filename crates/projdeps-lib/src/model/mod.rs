//! # Project Model
//!
//! Materialized projects and the published packages they import.
//!
//! A [`Site`] is the content of one project: its components and style assets,
//! plus the [`ProjectDependency`] entries it imports. Each dependency carries
//! its own `Site`, so the whole tree is reachable from the host project.
//! Dependencies are shared through `Arc`: the same materialized package may
//! sit under several parents, and identity (`Arc::ptr_eq`) is how externally
//! replaced models are told apart from the tracked ones.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Kinds of assets that can be imported from a dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetKind {
    Component,
    Mixin,
    StyleToken,
    Theme,
    ImageAsset,
    VariantGroup,
}

/// Stable identity of an importable asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetRef {
    pub kind: AssetKind,
    pub uuid: String,
}

impl AssetRef {
    pub fn new(kind: AssetKind, uuid: impl Into<String>) -> Self {
        Self {
            kind,
            uuid: uuid.into(),
        }
    }

    pub fn component(uuid: impl Into<String>) -> Self {
        Self::new(AssetKind::Component, uuid)
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.kind, self.uuid)
    }
}

/// How a component is used inside its project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentKind {
    #[default]
    Plain,
    Page,
    /// Arena frame wrapper; never instantiated by other projects
    Frame,
    /// Registered code component
    Code,
}

/// A node of a component's element tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TplNode {
    /// Instance of the component with the given uuid
    Instance {
        component: String,
        #[serde(default)]
        children: Vec<TplNode>,
    },
    Tag {
        tag: String,
        #[serde(default)]
        children: Vec<TplNode>,
    },
    Text {
        text: String,
    },
}

impl TplNode {
    pub fn instance(component: impl Into<String>) -> Self {
        TplNode::Instance {
            component: component.into(),
            children: Vec::new(),
        }
    }

    pub fn tag(tag: impl Into<String>, children: Vec<TplNode>) -> Self {
        TplNode::Tag {
            tag: tag.into(),
            children,
        }
    }

    /// Uuids of every component instantiated in this subtree, in document order
    pub fn instantiated_components<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TplNode::Instance {
                component,
                children,
            } => {
                out.push(component.as_str());
                for child in children {
                    child.instantiated_components(out);
                }
            }
            TplNode::Tag { children, .. } => {
                for child in children {
                    child.instantiated_components(out);
                }
            }
            TplNode::Text { .. } => {}
        }
    }
}

/// A named slot with the content it renders when the caller passes nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub name: String,
    #[serde(default)]
    pub default_contents: Vec<TplNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub kind: ComponentKind,
    #[serde(default)]
    pub slots: Vec<Slot>,
}

impl Component {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            kind: ComponentKind::Plain,
            slots: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: ComponentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_slot(mut self, name: impl Into<String>, default_contents: Vec<TplNode>) -> Self {
        self.slots.push(Slot {
            name: name.into(),
            default_contents,
        });
        self
    }

    /// Whether other projects can instantiate this component
    pub fn is_reusable(&self) -> bool {
        !matches!(self.kind, ComponentKind::Frame)
    }

    /// Uuids of components instantiated inside any slot's default content
    pub fn default_slot_components(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for slot in &self.slots {
            for node in &slot.default_contents {
                node.instantiated_components(&mut out);
            }
        }
        out
    }
}

/// Mixins, themes and global variant groups only matter by identity here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedAsset {
    pub uuid: String,
    pub name: String,
}

impl NamedAsset {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleToken {
    pub uuid: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageAssetKind {
    Icon,
    #[default]
    Picture,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub kind: ImageAssetKind,
}

/// Declared by packages that ship code without a user-facing project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostlessPackageInfo {
    pub name: String,
    /// Names of other hostless packages this one requires
    #[serde(default)]
    pub deps: Vec<String>,
}

/// Project-wide provider instance (e.g. an auth or data context)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalContext {
    pub uuid: String,
    /// Name of the code component providing the context
    pub component: String,
    #[serde(default)]
    pub props: BTreeMap<String, String>,
}

/// Content of a single project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub uuid: String,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub mixins: Vec<NamedAsset>,
    #[serde(default)]
    pub style_tokens: Vec<StyleToken>,
    #[serde(default)]
    pub themes: Vec<NamedAsset>,
    #[serde(default)]
    pub image_assets: Vec<ImageAsset>,
    #[serde(default)]
    pub global_variant_groups: Vec<NamedAsset>,
    #[serde(default)]
    pub project_dependencies: Vec<Arc<ProjectDependency>>,
    #[serde(default)]
    pub hostless_package_info: Option<HostlessPackageInfo>,
    #[serde(default)]
    pub global_contexts: Vec<GlobalContext>,
    /// Component kind (e.g. "button") to component uuid
    #[serde(default)]
    pub default_components: BTreeMap<String, String>,
}

impl Site {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            ..Self::default()
        }
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_mixin(mut self, uuid: &str, name: &str) -> Self {
        self.mixins.push(NamedAsset::new(uuid, name));
        self
    }

    pub fn with_style_token(mut self, uuid: &str, name: &str, value: &str) -> Self {
        self.style_tokens.push(StyleToken {
            uuid: uuid.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn with_theme(mut self, uuid: &str, name: &str) -> Self {
        self.themes.push(NamedAsset::new(uuid, name));
        self
    }

    pub fn with_image_asset(mut self, uuid: &str, name: &str, kind: ImageAssetKind) -> Self {
        self.image_assets.push(ImageAsset {
            uuid: uuid.to_string(),
            name: name.to_string(),
            kind,
        });
        self
    }

    pub fn with_variant_group(mut self, uuid: &str, name: &str) -> Self {
        self.global_variant_groups.push(NamedAsset::new(uuid, name));
        self
    }

    pub fn with_dependency(mut self, dep: Arc<ProjectDependency>) -> Self {
        self.project_dependencies.push(dep);
        self
    }

    pub fn with_hostless(mut self, name: &str, deps: &[&str]) -> Self {
        self.hostless_package_info = Some(HostlessPackageInfo {
            name: name.to_string(),
            deps: deps.iter().map(|d| d.to_string()).collect(),
        });
        self
    }

    pub fn with_global_context(mut self, uuid: &str, component: &str) -> Self {
        self.global_contexts.push(GlobalContext {
            uuid: uuid.to_string(),
            component: component.to_string(),
            props: BTreeMap::new(),
        });
        self
    }

    pub fn with_default_component(mut self, kind: &str, component_uuid: &str) -> Self {
        self.default_components
            .insert(kind.to_string(), component_uuid.to_string());
        self
    }

    /// Every asset this site exposes to importers (not its dependencies' assets)
    pub fn importable_assets(&self) -> impl Iterator<Item = AssetRef> + '_ {
        let components = self
            .components
            .iter()
            .map(|c| AssetRef::new(AssetKind::Component, c.uuid.as_str()));
        let mixins = self
            .mixins
            .iter()
            .map(|m| AssetRef::new(AssetKind::Mixin, m.uuid.as_str()));
        let tokens = self
            .style_tokens
            .iter()
            .map(|t| AssetRef::new(AssetKind::StyleToken, t.uuid.as_str()));
        let themes = self
            .themes
            .iter()
            .map(|t| AssetRef::new(AssetKind::Theme, t.uuid.as_str()));
        let images = self
            .image_assets
            .iter()
            .map(|i| AssetRef::new(AssetKind::ImageAsset, i.uuid.as_str()));
        let groups = self
            .global_variant_groups
            .iter()
            .map(|g| AssetRef::new(AssetKind::VariantGroup, g.uuid.as_str()));

        components
            .chain(mixins)
            .chain(tokens)
            .chain(themes)
            .chain(images)
            .chain(groups)
    }

    pub fn declares_component(&self, uuid: &str) -> bool {
        self.components.iter().any(|c| c.uuid == uuid)
    }

    pub fn direct_dependency(&self, pkg_id: &str) -> Option<&Arc<ProjectDependency>> {
        self.project_dependencies.iter().find(|d| d.pkg_id == pkg_id)
    }
}

/// A published package version imported into a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDependency {
    pub pkg_id: String,
    pub version: String,
    pub name: String,
    pub project_id: String,
    pub site: Site,
}

impl ProjectDependency {
    pub fn new(
        pkg_id: impl Into<String>,
        version: impl Into<String>,
        name: impl Into<String>,
        project_id: impl Into<String>,
        site: Site,
    ) -> Self {
        Self {
            pkg_id: pkg_id.into(),
            version: version.into(),
            name: name.into(),
            project_id: project_id.into(),
            site,
        }
    }

    pub fn hostless_info(&self) -> Option<&HostlessPackageInfo> {
        self.site.hostless_package_info.as_ref()
    }

    pub fn is_hostless(&self) -> bool {
        self.site.hostless_package_info.is_some()
    }

    /// Whether this package lists the hostless package `name` among its requirements
    pub fn requires_hostless(&self, name: &str) -> bool {
        self.hostless_info()
            .is_some_and(|info| info.deps.iter().any(|d| d == name))
    }
}

impl fmt::Display for ProjectDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// The project being edited, which imports the dependency tree
#[derive(Debug, Clone)]
pub struct HostProject {
    pub project_id: String,
    pub site: Site,
}

impl HostProject {
    pub fn new(project_id: impl Into<String>, site: Site) -> Self {
        Self {
            project_id: project_id.into(),
            site,
        }
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
