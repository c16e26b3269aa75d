//! Queue drain: push every parked report to the remote store
//!
//! One pass snapshots the queue in insertion order, attempts each
//! record, and removes exactly the keys it delivered or dropped. Failed
//! records keep their keys and their relative order and go again on the
//! next pass, so delivery is at-least-once and a record only leaves the
//! queue once the remote store has confirmed it. Reports enqueued while
//! a pass is running sit at higher keys and are untouched by it.

use shared::models::ReportSource;
use shared::{AppError, AppResult};
use tokio::sync::Mutex;

use crate::connectivity::ConnectivityMonitor;
use crate::queue::OfflineQueue;
use crate::submit::ReportSubmitter;

/// Tally of a completed drain pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    pub requeued: usize,
}

pub struct SyncEngine {
    queue: OfflineQueue,
    submitter: ReportSubmitter,
    connectivity: ConnectivityMonitor,
    // Single-flight guard: overlapping drain calls collapse into one pass.
    drain_lock: Mutex<()>,
}

impl SyncEngine {
    pub fn new(
        queue: OfflineQueue,
        submitter: ReportSubmitter,
        connectivity: ConnectivityMonitor,
    ) -> Self {
        Self {
            queue,
            submitter,
            connectivity,
            drain_lock: Mutex::new(()),
        }
    }

    /// Drain the queue once. Returns `None` when another pass is already
    /// in flight or the device is offline; the caller just tries later.
    pub async fn drain(&self) -> AppResult<Option<SyncOutcome>> {
        let Ok(_guard) = self.drain_lock.try_lock() else {
            tracing::debug!("drain already in flight, skipping");
            return Ok(None);
        };
        if !self.connectivity.is_online() {
            tracing::debug!("offline, skipping drain");
            return Ok(None);
        }

        let records = self.queue.snapshot()?;
        if records.is_empty() {
            return Ok(Some(SyncOutcome::default()));
        }

        let attempted = records.len();
        let mut succeeded = 0;
        let mut requeued = 0;
        let mut done = Vec::new();
        for (key, record) in records {
            match self
                .submitter
                .submit(&record, Some(ReportSource::OfflineSync))
                .await
            {
                Ok(receipt) => {
                    succeeded += 1;
                    done.push(key);
                    tracing::info!(
                        client_record_id = %record.client_record_id,
                        report_id = %receipt.report_id,
                        "queued report delivered"
                    );
                }
                // A missing local file never comes back; requeueing it
                // would poison every future pass.
                Err(AppError::AssetUnavailable(msg)) => {
                    done.push(key);
                    tracing::error!(
                        client_record_id = %record.client_record_id,
                        %msg,
                        "local asset gone, dropping queued report"
                    );
                }
                Err(err) => {
                    requeued += 1;
                    if !err.is_retryable() {
                        tracing::warn!(
                            client_record_id = %record.client_record_id,
                            error = %err,
                            "queued report rejected, will retry next pass"
                        );
                    }
                }
            }
        }

        self.queue.remove(&done)?;

        let outcome = SyncOutcome {
            attempted,
            succeeded,
            requeued,
        };
        tracing::info!(
            attempted = outcome.attempted,
            succeeded = outcome.succeeded,
            requeued = outcome.requeued,
            "drain pass finished"
        );
        Ok(Some(outcome))
    }

    /// Number of reports still waiting for delivery.
    pub fn backlog(&self) -> AppResult<u64> {
        Ok(self.queue.len()?)
    }
}
