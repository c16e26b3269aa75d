//! Report submission
//!
//! [`ReportSubmitter`] is the remote submission client: asset fetch, blob
//! upload, metadata write, point award — all four must succeed, partial
//! completion counts as total failure and the caller requeues. A duplicate
//! blob upload on retry is accepted waste; a lost report is not.
//!
//! [`ReportService`] is the user-facing path: validate, gate security
//! submissions by shift window, try direct submission, and fall back to the
//! offline queue on transient failure or while disconnected.

use shared::models::{
    Location, RecordKind, RemoteReceipt, RemoteReport, ReportSource, StaffProfile,
    SubmissionRecord,
};
use shared::{AppError, AppResult};
use std::path::PathBuf;
use std::sync::Arc;

use crate::attendance;
use crate::connectivity::ConnectivityMonitor;
use crate::queue::OfflineQueue;
use crate::remote::RemoteStore;

/// Points awarded per successfully persisted report.
pub const REPORT_POINT_REWARD: i64 = 10;

/// Uploads one submission record to the remote store.
#[derive(Clone)]
pub struct ReportSubmitter {
    store: Arc<dyn RemoteStore>,
}

impl ReportSubmitter {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Submit a record. `source` is `Some(OfflineSync)` when replaying from
    /// the queue, `None` for direct submission.
    ///
    /// Steps: (a) read the local asset — `AssetUnavailable` is fatal for
    /// this record, retry cannot restore a missing file; (b) upload the
    /// blob under a key derived from requester id + timestamp token;
    /// (c) write the metadata document tagged with provenance; (d) award
    /// points. Any failure after (a) leaves the record eligible for requeue.
    pub async fn submit(
        &self,
        record: &SubmissionRecord,
        source: Option<ReportSource>,
    ) -> AppResult<RemoteReceipt> {
        let bytes = tokio::fs::read(&record.local_asset_ref).await.map_err(|e| {
            AppError::asset_unavailable(format!(
                "{}: {e}",
                record.local_asset_ref.display()
            ))
        })?;

        let infix = match source {
            Some(ReportSource::OfflineSync) => "_sync",
            None => "",
        };
        let key = format!(
            "reports/{}{infix}_{}.jpg",
            record.requester_id,
            shared::util::now_millis()
        );

        let photo_url = self.store.upload_blob(&key, bytes, "image/jpeg").await?;

        let report = RemoteReport {
            user_id: record.requester_id.clone(),
            user_name: record.requester_name.clone(),
            user_division: record.requester_division,
            location_id: record.location_id.clone(),
            location_name: record.location_name.clone(),
            description: record.description.clone(),
            photo_url: photo_url.clone(),
            date: shared::util::today_local(),
            submitted_at: shared::util::now_millis(),
            source,
        };
        let report_id = self.store.add_report(report).await?;

        self.store
            .add_points(&record.requester_id, REPORT_POINT_REWARD)
            .await?;

        Ok(RemoteReceipt {
            report_id,
            photo_url,
        })
    }
}

/// What happened to a submitted report.
#[derive(Debug)]
pub enum ReportDelivery {
    /// Persisted remotely; points awarded
    Sent(RemoteReceipt),
    /// Saved to the offline queue, will send on next sync
    QueuedOffline,
}

/// Input for a new report.
#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub location: Location,
    pub description: String,
    pub local_asset_ref: PathBuf,
}

/// Direct submission path with offline fallback.
#[derive(Clone)]
pub struct ReportService {
    submitter: ReportSubmitter,
    queue: OfflineQueue,
    connectivity: ConnectivityMonitor,
    store: Arc<dyn RemoteStore>,
}

impl ReportService {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        queue: OfflineQueue,
        connectivity: ConnectivityMonitor,
    ) -> Self {
        Self {
            submitter: ReportSubmitter::new(store.clone()),
            queue,
            connectivity,
            store,
        }
    }

    /// Submit a report now, or queue it if that is not possible.
    pub async fn submit_report(
        &self,
        profile: &StaffProfile,
        draft: ReportDraft,
    ) -> AppResult<ReportDelivery> {
        self.submit_report_at(
            profile,
            draft,
            &shared::util::today_local(),
            shared::util::local_hour(),
        )
        .await
    }

    /// Clock-injected variant of [`submit_report`](Self::submit_report).
    pub async fn submit_report_at(
        &self,
        profile: &StaffProfile,
        draft: ReportDraft,
        date: &str,
        hour: u32,
    ) -> AppResult<ReportDelivery> {
        if draft.description.trim().is_empty() {
            return Err(AppError::validation("Description must not be empty"));
        }

        let record = SubmissionRecord {
            kind: RecordKind::Report,
            client_record_id: shared::util::new_record_id(),
            requester_id: profile.id.clone(),
            requester_name: profile.name.clone(),
            requester_division: profile.division,
            location_id: draft.location.id,
            location_name: draft.location.name,
            description: draft.description,
            local_asset_ref: draft.local_asset_ref,
            created_at_local: shared::util::now_millis(),
        };

        // Offline: trust-on-submit. The shift window cannot be checked
        // without the store, so the record queues unconditionally and the
        // user is told it will send later.
        if !self.connectivity.is_online() {
            self.queue.enqueue(&record)?;
            tracing::info!(
                requester = %record.requester_id,
                "Offline — report saved to local queue"
            );
            return Ok(ReportDelivery::QueuedOffline);
        }

        // Business-rule rejections are final: no retry, no queue. If the
        // attendance fetch itself fails on a transient error, reachability
        // was a false positive and the record degrades to the queue, same
        // as the offline branch above.
        match attendance::check_report_window(self.store.as_ref(), profile, date, hour).await {
            Ok(()) => {}
            Err(e) if e.is_retryable() => {
                tracing::warn!(error = %e, "Shift check unreachable, queuing for sync");
                self.queue.enqueue(&record)?;
                return Ok(ReportDelivery::QueuedOffline);
            }
            Err(e) => return Err(e),
        }

        match self.submitter.submit(&record, None).await {
            Ok(receipt) => Ok(ReportDelivery::Sent(receipt)),
            Err(e) if e.is_retryable() => {
                // Reachability was a false positive; degrade to the queue
                tracing::warn!(error = %e, "Direct submission failed, queuing for sync");
                self.queue.enqueue(&record)?;
                Ok(ReportDelivery::QueuedOffline)
            }
            Err(e) => Err(e),
        }
    }
}
