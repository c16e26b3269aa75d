//! Offline queue and drain pipeline, end to end against the in-memory store.

use ops_agent::connectivity::ConnectivityMonitor;
use ops_agent::queue::OfflineQueue;
use ops_agent::remote::{MemoryRemoteStore, RemoteStore};
use ops_agent::submit::{
    REPORT_POINT_REWARD, ReportDelivery, ReportDraft, ReportService, ReportSubmitter,
};
use ops_agent::sync::{SyncEngine, SyncOutcome};
use shared::AppResult;
use shared::models::{
    ActiveSos, Announcement, AppSettings, AttendanceRecord, Division, DutyState, Location,
    RecordKind, RemoteReport, ReportSource, Role, StaffProfile, SubmissionRecord,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn photo_file(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"jpeg-bytes").unwrap();
    path
}

fn record(asset: PathBuf, n: u32) -> SubmissionRecord {
    SubmissionRecord {
        kind: RecordKind::Report,
        client_record_id: format!("client-{n}"),
        requester_id: "u1".to_string(),
        requester_name: "Budi".to_string(),
        requester_division: Division::Cleaning,
        location_id: "loc-1".to_string(),
        location_name: "Gedung A".to_string(),
        description: format!("patroli {n}"),
        local_asset_ref: asset,
        created_at_local: n as i64,
    }
}

fn staff() -> StaffProfile {
    StaffProfile::new("u1", "Budi", Division::Cleaning, Role::Staf)
}

fn engine(
    queue: &OfflineQueue,
    store: &Arc<MemoryRemoteStore>,
    connectivity: &ConnectivityMonitor,
) -> SyncEngine {
    let store: Arc<dyn RemoteStore> = store.clone();
    SyncEngine::new(
        queue.clone(),
        ReportSubmitter::new(store),
        connectivity.clone(),
    )
}

#[test]
fn queue_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("queue.redb");
    let asset = photo_file(&dir, "a.jpg");

    {
        let queue = OfflineQueue::open(&db_path).unwrap();
        queue.enqueue(&record(asset.clone(), 1)).unwrap();
        queue.enqueue(&record(asset.clone(), 2)).unwrap();
    }

    let queue = OfflineQueue::open(&db_path).unwrap();
    let records = queue.read_all().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].client_record_id, "client-1");
    assert_eq!(records[1].client_record_id, "client-2");
}

#[tokio::test]
async fn offline_submission_goes_to_queue() {
    let dir = TempDir::new().unwrap();
    let queue = OfflineQueue::open(dir.path().join("queue.redb")).unwrap();
    let store = Arc::new(MemoryRemoteStore::new());
    store.insert_staff(staff());
    let connectivity = ConnectivityMonitor::new(false);

    let service = ReportService::new(store.clone(), queue.clone(), connectivity);
    let delivery = service
        .submit_report(
            &staff(),
            ReportDraft {
                location: Location {
                    id: "loc-1".to_string(),
                    name: "Gedung A".to_string(),
                },
                description: "lampu mati".to_string(),
                local_asset_ref: photo_file(&dir, "a.jpg"),
            },
        )
        .await
        .unwrap();

    assert!(matches!(delivery, ReportDelivery::QueuedOffline));
    assert_eq!(queue.len().unwrap(), 1);
    assert_eq!(store.report_count(), 0);
}

#[tokio::test]
async fn drain_delivers_in_order_and_awards_points() {
    let dir = TempDir::new().unwrap();
    let queue = OfflineQueue::open(dir.path().join("queue.redb")).unwrap();
    let store = Arc::new(MemoryRemoteStore::new());
    store.insert_staff(staff());
    let connectivity = ConnectivityMonitor::new(true);

    let asset = photo_file(&dir, "a.jpg");
    queue.enqueue(&record(asset.clone(), 1)).unwrap();
    queue.enqueue(&record(asset, 2)).unwrap();

    let engine = engine(&queue, &store, &connectivity);
    let outcome = engine.drain().await.unwrap().unwrap();

    assert_eq!(
        outcome,
        SyncOutcome {
            attempted: 2,
            succeeded: 2,
            requeued: 0
        }
    );
    assert!(queue.is_empty().unwrap());

    let reports = store.reports();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].description, "patroli 1");
    assert_eq!(reports[1].description, "patroli 2");
    // Replayed reports carry their provenance tag
    assert_eq!(reports[0].source, Some(ReportSource::OfflineSync));
    assert!(reports[0].photo_url.contains("_sync_"));

    let profile = store.staff_snapshot("u1").unwrap();
    assert_eq!(profile.total_points, 2 * REPORT_POINT_REWARD);
}

#[tokio::test]
async fn metadata_failure_keeps_record_queued() {
    let dir = TempDir::new().unwrap();
    let queue = OfflineQueue::open(dir.path().join("queue.redb")).unwrap();
    let store = Arc::new(MemoryRemoteStore::new());
    store.insert_staff(staff());
    let connectivity = ConnectivityMonitor::new(true);

    queue.enqueue(&record(photo_file(&dir, "a.jpg"), 1)).unwrap();
    store.set_fail_report_write(true);

    let engine = engine(&queue, &store, &connectivity);
    let outcome = engine.drain().await.unwrap().unwrap();

    // Blob went up, metadata did not: the record stays queued
    assert_eq!(outcome.requeued, 1);
    assert_eq!(queue.len().unwrap(), 1);
    assert_eq!(store.blob_count(), 1);
    assert_eq!(store.report_count(), 0);
    assert_eq!(store.staff_snapshot("u1").unwrap().total_points, 0);

    // Next pass retries the whole record: at-least-once, so the blob
    // uploads a second time under a fresh key
    store.set_fail_report_write(false);
    let outcome = engine.drain().await.unwrap().unwrap();
    assert_eq!(outcome.succeeded, 1);
    assert!(queue.is_empty().unwrap());
    assert_eq!(store.blob_count(), 2);
    assert_eq!(store.report_count(), 1);
}

#[tokio::test]
async fn failed_records_requeue_in_order() {
    let dir = TempDir::new().unwrap();
    let queue = OfflineQueue::open(dir.path().join("queue.redb")).unwrap();
    let store = Arc::new(MemoryRemoteStore::new());
    store.insert_staff(staff());
    let connectivity = ConnectivityMonitor::new(true);

    let asset = photo_file(&dir, "a.jpg");
    for n in 1..=3 {
        queue.enqueue(&record(asset.clone(), n)).unwrap();
    }
    store.set_fail_report_write(true);

    let engine = engine(&queue, &store, &connectivity);
    engine.drain().await.unwrap().unwrap();

    let remaining = queue.read_all().unwrap();
    let ids: Vec<_> = remaining.iter().map(|r| r.client_record_id.as_str()).collect();
    assert_eq!(ids, vec!["client-1", "client-2", "client-3"]);
}

#[tokio::test]
async fn missing_asset_is_dropped_not_requeued() {
    let dir = TempDir::new().unwrap();
    let queue = OfflineQueue::open(dir.path().join("queue.redb")).unwrap();
    let store = Arc::new(MemoryRemoteStore::new());
    store.insert_staff(staff());
    let connectivity = ConnectivityMonitor::new(true);

    queue
        .enqueue(&record(dir.path().join("not-there.jpg"), 1))
        .unwrap();

    let engine = engine(&queue, &store, &connectivity);
    let outcome = engine.drain().await.unwrap().unwrap();

    assert_eq!(outcome.attempted, 1);
    assert_eq!(outcome.succeeded, 0);
    assert_eq!(outcome.requeued, 0);
    assert!(queue.is_empty().unwrap());
    assert_eq!(store.report_count(), 0);
}

#[tokio::test]
async fn drain_skips_while_offline() {
    let dir = TempDir::new().unwrap();
    let queue = OfflineQueue::open(dir.path().join("queue.redb")).unwrap();
    let store = Arc::new(MemoryRemoteStore::new());
    let connectivity = ConnectivityMonitor::new(false);

    queue.enqueue(&record(photo_file(&dir, "a.jpg"), 1)).unwrap();

    let engine = engine(&queue, &store, &connectivity);
    assert!(engine.drain().await.unwrap().is_none());
    assert_eq!(queue.len().unwrap(), 1);
}

/// Store that enqueues one extra record when the first blob upload of a
/// drain pass starts, standing in for a submission racing the pass.
struct EnqueueDuringUpload {
    inner: Arc<MemoryRemoteStore>,
    queue: OfflineQueue,
    late: Mutex<Option<SubmissionRecord>>,
}

#[async_trait::async_trait]
impl RemoteStore for EnqueueDuringUpload {
    async fn get_staff(&self, id: &str) -> AppResult<Option<StaffProfile>> {
        self.inner.get_staff(id).await
    }

    async fn update_duty(&self, id: &str, duty: DutyState) -> AppResult<()> {
        self.inner.update_duty(id, duty).await
    }

    async fn list_pending_staff(&self) -> AppResult<Vec<StaffProfile>> {
        self.inner.list_pending_staff().await
    }

    async fn add_points(&self, id: &str, delta: i64) -> AppResult<()> {
        self.inner.add_points(id, delta).await
    }

    async fn upload_blob(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<String> {
        if let Some(record) = self.late.lock().unwrap().take() {
            self.queue.enqueue(&record).unwrap();
        }
        self.inner.upload_blob(key, bytes, content_type).await
    }

    async fn add_report(&self, report: RemoteReport) -> AppResult<String> {
        self.inner.add_report(report).await
    }

    async fn list_locations(&self) -> AppResult<Vec<Location>> {
        self.inner.list_locations().await
    }

    async fn get_attendance(&self, key: &str) -> AppResult<Option<AttendanceRecord>> {
        self.inner.get_attendance(key).await
    }

    async fn put_attendance(&self, key: &str, record: AttendanceRecord) -> AppResult<()> {
        self.inner.put_attendance(key, record).await
    }

    async fn active_sos(&self) -> AppResult<Option<ActiveSos>> {
        self.inner.active_sos().await
    }

    async fn add_sos(&self, sos: ActiveSos) -> AppResult<String> {
        self.inner.add_sos(sos).await
    }

    async fn resolve_sos(&self, id: &str, resolved_by: &str, resolved_at: i64) -> AppResult<()> {
        self.inner.resolve_sos(id, resolved_by, resolved_at).await
    }

    async fn get_announcement(&self) -> AppResult<Option<Announcement>> {
        self.inner.get_announcement().await
    }

    async fn set_announcement(&self, announcement: Announcement) -> AppResult<()> {
        self.inner.set_announcement(announcement).await
    }

    async fn get_app_settings(&self) -> AppResult<Option<AppSettings>> {
        self.inner.get_app_settings().await
    }

    async fn push_tokens_for_roles(&self, roles: &[Role]) -> AppResult<Vec<String>> {
        self.inner.push_tokens_for_roles(roles).await
    }

    async fn push_tokens_except(&self, exclude_id: &str) -> AppResult<Vec<String>> {
        self.inner.push_tokens_except(exclude_id).await
    }
}

#[tokio::test]
async fn record_enqueued_mid_drain_survives_the_pass() {
    let dir = TempDir::new().unwrap();
    let queue = OfflineQueue::open(dir.path().join("queue.redb")).unwrap();
    let inner = Arc::new(MemoryRemoteStore::new());
    inner.insert_staff(staff());
    let connectivity = ConnectivityMonitor::new(true);

    let asset = photo_file(&dir, "a.jpg");
    queue.enqueue(&record(asset.clone(), 1)).unwrap();

    let store: Arc<dyn RemoteStore> = Arc::new(EnqueueDuringUpload {
        inner: inner.clone(),
        queue: queue.clone(),
        late: Mutex::new(Some(record(asset, 2))),
    });
    let engine = SyncEngine::new(
        queue.clone(),
        ReportSubmitter::new(store),
        connectivity.clone(),
    );

    let outcome = engine.drain().await.unwrap().unwrap();
    assert_eq!(outcome.attempted, 1);
    assert_eq!(outcome.succeeded, 1);

    // The record enqueued while the pass was running is still here
    let remaining = queue.read_all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].client_record_id, "client-2");

    // The next pass delivers it
    let outcome = engine.drain().await.unwrap().unwrap();
    assert_eq!(outcome.succeeded, 1);
    assert!(queue.is_empty().unwrap());
    assert_eq!(inner.report_count(), 2);
}

#[tokio::test]
async fn reconnect_flow_flushes_offline_submission() {
    let dir = TempDir::new().unwrap();
    let queue = OfflineQueue::open(dir.path().join("queue.redb")).unwrap();
    let store = Arc::new(MemoryRemoteStore::new());
    store.insert_staff(staff());
    let connectivity = ConnectivityMonitor::new(false);

    let service = ReportService::new(store.clone(), queue.clone(), connectivity.clone());
    service
        .submit_report(
            &staff(),
            ReportDraft {
                location: Location {
                    id: "loc-1".to_string(),
                    name: "Gedung A".to_string(),
                },
                description: "pagar rusak".to_string(),
                local_asset_ref: photo_file(&dir, "a.jpg"),
            },
        )
        .await
        .unwrap();
    assert_eq!(queue.len().unwrap(), 1);

    connectivity.set_online(true);
    let engine = engine(&queue, &store, &connectivity);
    let outcome = engine.drain().await.unwrap().unwrap();

    assert_eq!(outcome.succeeded, 1);
    assert!(queue.is_empty().unwrap());
    assert_eq!(store.reports()[0].source, Some(ReportSource::OfflineSync));
}
