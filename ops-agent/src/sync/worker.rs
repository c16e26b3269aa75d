//! Background worker that decides when to drain
//!
//! Three triggers share one select loop: the connectivity watch flipping
//! to online, an explicit refresh nudge (a report was just queued), and
//! a periodic scan. The engine's single-flight guard means coinciding
//! triggers cost one pass, not several.

use std::sync::Arc;
use tokio::sync::{Notify, mpsc};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::connectivity::ConnectivityMonitor;
use crate::sync::{SyncEngine, SyncOutcome};

pub struct SyncWorker {
    engine: Arc<SyncEngine>,
    connectivity: ConnectivityMonitor,
    refresh: Arc<Notify>,
    scan_interval: Duration,
    shutdown: CancellationToken,
    outcomes: Option<mpsc::UnboundedSender<SyncOutcome>>,
}

impl SyncWorker {
    pub fn new(
        engine: Arc<SyncEngine>,
        connectivity: ConnectivityMonitor,
        refresh: Arc<Notify>,
        scan_interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            engine,
            connectivity,
            refresh,
            scan_interval,
            shutdown,
            outcomes: None,
        }
    }

    /// Forward the tally of each pass that actually attempted something,
    /// one batched message per pass (the UI shows it as a single summary).
    pub fn with_outcomes(mut self, tx: mpsc::UnboundedSender<SyncOutcome>) -> Self {
        self.outcomes = Some(tx);
        self
    }

    /// Run until shutdown.
    ///
    /// 1. Drain once on startup to pick up anything left from a crash.
    /// 2. Drain whenever connectivity comes back.
    /// 3. Drain on refresh nudges and on the periodic scan.
    pub async fn run(self) {
        tracing::info!("SyncWorker started");

        self.drain_and_log().await;

        let mut online_rx = self.connectivity.subscribe();
        let mut interval = tokio::time::interval(self.scan_interval);
        interval.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("SyncWorker shutting down");
                    break;
                }

                changed = online_rx.changed() => {
                    if changed.is_err() {
                        tracing::info!("connectivity channel closed, SyncWorker stopping");
                        break;
                    }
                    if *online_rx.borrow_and_update() {
                        self.drain_and_log().await;
                    }
                }

                _ = self.refresh.notified() => {
                    self.drain_and_log().await;
                }

                _ = interval.tick() => {
                    self.drain_and_log().await;
                }
            }
        }
    }

    async fn drain_and_log(&self) {
        match self.engine.drain().await {
            Ok(Some(outcome)) if outcome.attempted > 0 => {
                if let Some(tx) = &self.outcomes {
                    let _ = tx.send(outcome);
                }
            }
            Ok(_) => {}
            Err(e) => tracing::error!("drain pass failed: {e}"),
        }
    }
}
