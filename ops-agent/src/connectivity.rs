//! Connectivity monitor
//!
//! Wraps a watch channel over the platform's reachability callback. Purely
//! observational: it signals transitions, it never retries or queues.
//! Reachability is a hint, not a guarantee — the submission path still
//! independently falls back to the offline queue when a send fails during
//! a connectivity flap.

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone)]
pub struct ConnectivityMonitor {
    tx: Arc<watch::Sender<bool>>,
}

impl ConnectivityMonitor {
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { tx: Arc::new(tx) }
    }

    /// Feed a reachability transition (called from the platform callback).
    /// `online` means connected AND internet-reachable.
    pub fn set_online(&self, online: bool) {
        // send_replace succeeds even with no subscribers
        let previous = self.tx.send_replace(online);
        if previous != online {
            tracing::info!(online, "Connectivity changed");
        }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Subscribe to reachability transitions. Each delivery is the latest
    /// state, not a diff.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}
