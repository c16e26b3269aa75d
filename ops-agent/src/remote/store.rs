//! RemoteStore trait — the engine's only view of the backend
//!
//! Collections consumed (schema-level): `users/{id}`, `reports/{autoId}`,
//! `attendance/{date}_{userId}`, `active_sos/{autoId}`,
//! `app_config/announcement`, `app_config/settings`.
//!
//! Error contract: transport failures surface as `AppError::Network`
//! (retryable — callers fall back to the offline queue); a missing document
//! is `Ok(None)` for the `get_*` operations and `AppError::NotFound` for
//! mutations of a specific document.

use async_trait::async_trait;
use shared::AppResult;
use shared::models::{
    ActiveSos, Announcement, AppSettings, AttendanceRecord, DutyState, Location, RemoteReport,
    Role, StaffProfile,
};

#[async_trait]
pub trait RemoteStore: Send + Sync {
    // ========== Staff profiles ==========

    async fn get_staff(&self, id: &str) -> AppResult<Option<StaffProfile>>;

    /// Replace the duty-state block on a staff profile.
    async fn update_duty(&self, id: &str, duty: DutyState) -> AppResult<()>;

    /// All profiles currently in `pending` status, for approval routing.
    /// Filtering by approver eligibility is client-side (the store has no
    /// multi-field OR query).
    async fn list_pending_staff(&self) -> AppResult<Vec<StaffProfile>>;

    /// Increment a staff member's point total by `delta`.
    async fn add_points(&self, id: &str, delta: i64) -> AppResult<()>;

    // ========== Reports & blobs ==========

    /// Upload a binary asset under `key`; returns the public blob URL.
    async fn upload_blob(&self, key: &str, bytes: Vec<u8>, content_type: &str)
    -> AppResult<String>;

    /// Persist a report document; returns the assigned document ID.
    async fn add_report(&self, report: RemoteReport) -> AppResult<String>;

    /// The location catalog reports are filed against.
    async fn list_locations(&self) -> AppResult<Vec<Location>>;

    // ========== Attendance ==========

    async fn get_attendance(&self, key: &str) -> AppResult<Option<AttendanceRecord>>;

    /// Write an attendance record under its deterministic key. Overwrites
    /// any existing record for the same key (idempotent check-in).
    async fn put_attendance(&self, key: &str, record: AttendanceRecord) -> AppResult<()>;

    // ========== SOS ==========

    /// The single ACTIVE SOS, if one exists.
    async fn active_sos(&self) -> AppResult<Option<ActiveSos>>;

    /// Append a new SOS record; returns the assigned document ID.
    async fn add_sos(&self, sos: ActiveSos) -> AppResult<String>;

    /// Mark an SOS as RESOLVED in place (records are never deleted).
    async fn resolve_sos(&self, id: &str, resolved_by: &str, resolved_at: i64) -> AppResult<()>;

    // ========== App config ==========

    async fn get_announcement(&self) -> AppResult<Option<Announcement>>;

    async fn set_announcement(&self, announcement: Announcement) -> AppResult<()>;

    async fn get_app_settings(&self) -> AppResult<Option<AppSettings>>;

    // ========== Push-token queries ==========

    /// Push tokens of every staff member whose role is in `roles`.
    async fn push_tokens_for_roles(&self, roles: &[Role]) -> AppResult<Vec<String>>;

    /// Push tokens of every staff member except `exclude_id`.
    async fn push_tokens_except(&self, exclude_id: &str) -> AppResult<Vec<String>>;
}
