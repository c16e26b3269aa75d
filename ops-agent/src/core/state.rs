//! Shared agent state: the wired-up service graph
//!
//! One `AgentState` owns every service and the handles they share. All
//! of it is cheap to clone; the queue, the remote store, and the
//! connectivity channel are reference-counted underneath.

use shared::AppResult;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::appconfig::AppConfigService;
use crate::approval::ApprovalService;
use crate::attendance::AttendanceService;
use crate::connectivity::ConnectivityMonitor;
use crate::core::config::Config;
use crate::locations::LocationCatalog;
use crate::notify::PushDispatcher;
use crate::queue::OfflineQueue;
use crate::remote::{HttpRemoteStore, RemoteStore};
use crate::sos::SosService;
use crate::status::StatusService;
use crate::submit::{ReportSubmitter, ReportService};
use crate::sync::{SyncEngine, SyncWorker};

#[derive(Clone)]
pub struct AgentState {
    pub config: Config,
    pub store: Arc<dyn RemoteStore>,
    pub queue: OfflineQueue,
    pub connectivity: ConnectivityMonitor,
    /// Nudges the sync worker to drain right now
    pub sync_refresh: Arc<Notify>,
    pub sync_engine: Arc<SyncEngine>,
    pub reports: ReportService,
    pub attendance: AttendanceService,
    pub approvals: ApprovalService,
    pub status: StatusService,
    pub sos: SosService,
    pub app_config: AppConfigService,
    pub locations: LocationCatalog,
    pub push: PushDispatcher,
}

impl AgentState {
    /// Wire the full service graph against the HTTP remote store.
    pub fn initialize(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| shared::AppError::storage(format!("Cannot create work dir: {e}")))?;

        let store: Arc<dyn RemoteStore> = Arc::new(HttpRemoteStore::new(config)?);
        let queue = OfflineQueue::open(config.queue_path())?;
        Ok(Self::with_store(config.clone(), store, queue))
    }

    /// Wire the service graph against any store implementation.
    pub fn with_store(config: Config, store: Arc<dyn RemoteStore>, queue: OfflineQueue) -> Self {
        let connectivity = ConnectivityMonitor::default();
        let push = PushDispatcher::new(&config);
        let sync_engine = Arc::new(SyncEngine::new(
            queue.clone(),
            ReportSubmitter::new(store.clone()),
            connectivity.clone(),
        ));

        Self {
            store: store.clone(),
            queue: queue.clone(),
            connectivity: connectivity.clone(),
            sync_refresh: Arc::new(Notify::new()),
            sync_engine,
            reports: ReportService::new(store.clone(), queue, connectivity),
            attendance: AttendanceService::new(store.clone()),
            approvals: ApprovalService::new(store.clone()).with_push(push.clone()),
            status: StatusService::new(store.clone()).with_push(push.clone()),
            sos: SosService::new(store.clone()).with_push(push.clone()),
            app_config: AppConfigService::new(store.clone()),
            locations: LocationCatalog::new(store, &config.work_dir),
            push,
            config,
        }
    }

    /// Spawn the background sync worker. Returns its join handle; the
    /// worker stops when `shutdown` is cancelled.
    pub fn spawn_sync_worker(&self, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        let worker = SyncWorker::new(
            self.sync_engine.clone(),
            self.connectivity.clone(),
            self.sync_refresh.clone(),
            Duration::from_secs(self.config.sync_scan_interval_secs),
            shutdown,
        );
        tokio::spawn(worker.run())
    }
}
