//! Collaborator hooks invoked by the dependency manager
//!
//! The manager owns the dependency graph, not the rest of the project. Anything
//! outside the graph that must react to a mutation (instances referencing a
//! removed dependency, caches keyed by a site, UI refresh) plugs in here.

use super::change::ProjectChange;
use crate::model::ProjectDependency;

pub trait ProjectHooks: Send + Sync {
    /// Called inside the removal change, after the dependency left the direct list
    fn remove_dependency_references(&self, _dep: &ProjectDependency, _change: &mut ProjectChange) {}

    /// A dependency's site was replaced by an upgrade
    fn invalidate_site_cache(&self, _site_uuid: &str) {}

    /// A change touching the dependency graph was committed
    fn on_dependencies_changed(&self, _revision: u64) {}
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl ProjectHooks for NoopHooks {}

#[cfg(any(test, feature = "test-utils"))]
pub use recording::{HookEvent, RecordingHooks};

#[cfg(any(test, feature = "test-utils"))]
mod recording {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum HookEvent {
        ReferencesRemoved(String),
        SiteInvalidated(String),
        Changed(u64),
    }

    /// Hooks recording every call, in order
    #[derive(Debug, Default)]
    pub struct RecordingHooks {
        events: Mutex<Vec<HookEvent>>,
    }

    impl RecordingHooks {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<HookEvent> {
            self.events
                .lock()
                .map(|events| events.clone())
                .unwrap_or_default()
        }

        fn push(&self, event: HookEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event);
            }
        }
    }

    impl ProjectHooks for RecordingHooks {
        fn remove_dependency_references(&self, dep: &ProjectDependency, _change: &mut ProjectChange) {
            self.push(HookEvent::ReferencesRemoved(dep.pkg_id.clone()));
        }

        fn invalidate_site_cache(&self, site_uuid: &str) {
            self.push(HookEvent::SiteInvalidated(site_uuid.to_string()));
        }

        fn on_dependencies_changed(&self, revision: u64) {
            self.push(HookEvent::Changed(revision));
        }
    }
}
