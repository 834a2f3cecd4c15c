//! Background refresh of published-version metadata
//!
//! Refreshes never block a mutation. Each package id gets its own task; the
//! outcome comes back over a channel and is applied by the manager whenever it
//! next drains. Failed fetches are logged and produce an empty outcome.

use crate::registry::{RegistryClient, VersionMeta};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub pkg_id: String,
    /// `None` when the fetch failed
    pub meta: Option<VersionMeta>,
}

#[derive(Debug)]
pub struct MetadataRefresher {
    tx: mpsc::UnboundedSender<RefreshOutcome>,
    rx: mpsc::UnboundedReceiver<RefreshOutcome>,
    in_flight: Vec<JoinHandle<()>>,
}

impl Default for MetadataRefresher {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataRefresher {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            in_flight: Vec::new(),
        }
    }

    /// Spawn one fetch per package id on the current tokio runtime
    ///
    /// Outside a runtime nothing is scheduled and 0 is returned.
    pub fn schedule<R>(&mut self, registry: &Arc<R>, pkg_ids: impl IntoIterator<Item = String>) -> usize
    where
        R: RegistryClient + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            debug!("No async runtime available, skipping metadata refresh");
            return 0;
        };
        let before = self.in_flight.len();
        for pkg_id in pkg_ids {
            let registry = Arc::clone(registry);
            let tx = self.tx.clone();
            trace!("Scheduling metadata refresh for {}", pkg_id);

            self.in_flight.push(runtime.spawn(async move {
                let meta = match registry.get_pkg_version_meta(&pkg_id).await {
                    Ok(meta) => Some(meta),
                    Err(e) => {
                        warn!("Failed to refresh metadata for {}: {}", pkg_id, e);
                        None
                    }
                };
                // The receiver only goes away with the manager
                let _ = tx.send(RefreshOutcome { pkg_id, meta });
            }));
        }
        self.in_flight.len() - before
    }

    /// Number of refresh tasks that have not finished yet
    pub fn pending(&self) -> usize {
        self.in_flight.iter().filter(|h| !h.is_finished()).count()
    }

    /// Outcomes delivered so far, without waiting
    pub fn drain(&mut self) -> Vec<RefreshOutcome> {
        self.in_flight.retain(|h| !h.is_finished());
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Wait for every in-flight refresh, then drain
    pub async fn settle(&mut self) -> Vec<RefreshOutcome> {
        for handle in std::mem::take(&mut self.in_flight) {
            if let Err(e) = handle.await {
                warn!("Metadata refresh task failed: {}", e);
            }
        }
        self.drain()
    }
}

#[cfg(test)]
mod tests {
    include!("refresh.test.rs");
}
