//! # Graph Module
//!
//! Dependency-graph building blocks used by the [`crate::manager`] façade.
//!
//! ## Modules
//!
//! - [`traversal`] - Breadth-first walks over nested dependency sites
//! - [`resolver`] - Single-version closure maps, conflict and cycle checks
//! - [`dependency_graph`] - petgraph view of a closure (acyclicity, dependents)
//! - [`promoter`] - Transitive dependencies that must become direct
//! - [`ownership`] - Asset to owning-dependency index
//! - [`store`] - Tracked direct dependencies and their fetched metadata

pub mod dependency_graph;
pub mod ownership;
pub mod promoter;
pub mod resolver;
pub mod store;
pub mod traversal;

pub use dependency_graph::{DependencyGraph, DependencyNode};
pub use ownership::AssetOwnershipIndex;
pub use promoter::TransitivePromoter;
pub use resolver::DependencyMap;
pub use store::{DependencyGraphStore, DependencyRecord};
pub use traversal::TraversalRoot;

use crate::registry::RegistryError;
use thiserror::Error;

/// Failures of dependency-graph operations
///
/// Every validation failure is raised before the project is touched, so a
/// caller receiving one of these can assume nothing changed.
#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("You cannot import the current project")]
    SelfImport,

    #[error("{project_id} has no published versions")]
    UnpublishedPackage { project_id: String },

    #[error("{project_id} has already been imported")]
    AlreadyImported { project_id: String },

    #[error("You cannot import {project_id} because it has auth enabled")]
    AuthUnsupported { project_id: String },

    #[error(
        "Importing {imported_project_id} failed because of a circular dependency with this project"
    )]
    CircularDependency { imported_project_id: String },

    #[error(
        "Conflicting versions of '{name}' (pkgId={pkg_id}): this project uses {version_a}, the import requires {version_b}"
    )]
    VersionConflict {
        pkg_id: String,
        name: String,
        version_a: String,
        version_b: String,
    },

    #[error(
        "Cannot remove {pkg_id} because it is a hostless package dependency for {}",
        .blocking_names.join(", ")
    )]
    HostlessDependentsExist {
        pkg_id: String,
        blocking_names: Vec<String>,
    },

    #[error("{pkg_id} is not a direct dependency of this project")]
    UnknownDependency { pkg_id: String },

    #[error("Dependency graph invariant violated: {reason}")]
    InvariantViolation { reason: String },

    #[error("Registry request failed: {source}")]
    Registry {
        #[from]
        source: RegistryError,
    },
}
