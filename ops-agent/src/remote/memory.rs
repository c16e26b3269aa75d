//! MemoryRemoteStore — in-memory store for tests and local development
//!
//! DashMap-backed implementation of [`RemoteStore`] with injectable
//! failures, so the sync pipeline's partial-failure behavior (blob uploaded,
//! metadata write fails) can be exercised without a network.

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::{
    ActiveSos, Announcement, AppSettings, AttendanceRecord, DutyState, Location, RemoteReport,
    Role, SosStatus, StaffProfile,
};
use shared::{AppError, AppResult};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::remote::RemoteStore;

/// In-memory remote store with failure injection.
#[derive(Default)]
pub struct MemoryRemoteStore {
    staff: DashMap<String, StaffProfile>,
    locations: RwLock<Vec<Location>>,
    reports: RwLock<Vec<(String, RemoteReport)>>,
    attendance: DashMap<String, AttendanceRecord>,
    sos: RwLock<Vec<ActiveSos>>,
    announcement: RwLock<Option<Announcement>>,
    settings: RwLock<Option<AppSettings>>,
    blobs: DashMap<String, Vec<u8>>,
    next_id: AtomicU64,

    // Failure switches
    fail_all: AtomicBool,
    fail_blob_upload: AtomicBool,
    fail_report_write: AtomicBool,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_staff(&self, profile: StaffProfile) {
        self.staff.insert(profile.id.clone(), profile);
    }

    pub fn set_app_settings(&self, settings: AppSettings) {
        *self.settings.write().unwrap() = Some(settings);
    }

    pub fn set_locations(&self, locations: Vec<Location>) {
        *self.locations.write().unwrap() = locations;
    }

    /// Simulate total connectivity loss: every operation fails with a
    /// transient network error.
    pub fn set_offline(&self, offline: bool) {
        self.fail_all.store(offline, Ordering::SeqCst);
    }

    /// Fail blob uploads only (step b of submission).
    pub fn set_fail_blob_upload(&self, fail: bool) {
        self.fail_blob_upload.store(fail, Ordering::SeqCst);
    }

    /// Fail report metadata writes only (step c) — blobs still upload, so
    /// this reproduces the partial-completion case.
    pub fn set_fail_report_write(&self, fail: bool) {
        self.fail_report_write.store(fail, Ordering::SeqCst);
    }

    pub fn reports(&self) -> Vec<RemoteReport> {
        self.reports
            .read()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn report_count(&self) -> usize {
        self.reports.read().unwrap().len()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.len()
    }

    pub fn attendance_count(&self) -> usize {
        self.attendance.len()
    }

    pub fn staff_snapshot(&self, id: &str) -> Option<StaffProfile> {
        self.staff.get(id).map(|p| p.clone())
    }

    fn gate(&self) -> AppResult<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(AppError::network("simulated connectivity loss"));
        }
        Ok(())
    }

    fn assign_id(&self) -> String {
        format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn get_staff(&self, id: &str) -> AppResult<Option<StaffProfile>> {
        self.gate()?;
        Ok(self.staff.get(id).map(|p| p.clone()))
    }

    async fn update_duty(&self, id: &str, duty: DutyState) -> AppResult<()> {
        self.gate()?;
        match self.staff.get_mut(id) {
            Some(mut profile) => {
                profile.duty = duty;
                Ok(())
            }
            None => Err(AppError::not_found(format!("staff {id}"))),
        }
    }

    async fn list_pending_staff(&self) -> AppResult<Vec<StaffProfile>> {
        self.gate()?;
        Ok(self
            .staff
            .iter()
            .filter(|p| p.duty.status == shared::models::DutyStatus::Pending)
            .map(|p| p.clone())
            .collect())
    }

    async fn add_points(&self, id: &str, delta: i64) -> AppResult<()> {
        self.gate()?;
        match self.staff.get_mut(id) {
            Some(mut profile) => {
                profile.total_points += delta;
                Ok(())
            }
            None => Err(AppError::not_found(format!("staff {id}"))),
        }
    }

    async fn upload_blob(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> AppResult<String> {
        self.gate()?;
        if self.fail_blob_upload.load(Ordering::SeqCst) {
            return Err(AppError::network("simulated blob upload failure"));
        }
        self.blobs.insert(key.to_string(), bytes);
        Ok(format!("memory://blobs/{key}"))
    }

    async fn add_report(&self, report: RemoteReport) -> AppResult<String> {
        self.gate()?;
        if self.fail_report_write.load(Ordering::SeqCst) {
            return Err(AppError::network("simulated report write failure"));
        }
        let id = self.assign_id();
        self.reports.write().unwrap().push((id.clone(), report));
        Ok(id)
    }

    async fn list_locations(&self) -> AppResult<Vec<Location>> {
        self.gate()?;
        Ok(self.locations.read().unwrap().clone())
    }

    async fn get_attendance(&self, key: &str) -> AppResult<Option<AttendanceRecord>> {
        self.gate()?;
        Ok(self.attendance.get(key).map(|r| r.clone()))
    }

    async fn put_attendance(&self, key: &str, record: AttendanceRecord) -> AppResult<()> {
        self.gate()?;
        self.attendance.insert(key.to_string(), record);
        Ok(())
    }

    async fn active_sos(&self) -> AppResult<Option<ActiveSos>> {
        self.gate()?;
        Ok(self
            .sos
            .read()
            .unwrap()
            .iter()
            .find(|s| s.status == SosStatus::Active)
            .cloned())
    }

    async fn add_sos(&self, mut sos: ActiveSos) -> AppResult<String> {
        self.gate()?;
        let id = self.assign_id();
        sos.id = Some(id.clone());
        self.sos.write().unwrap().push(sos);
        Ok(id)
    }

    async fn resolve_sos(&self, id: &str, resolved_by: &str, resolved_at: i64) -> AppResult<()> {
        self.gate()?;
        let mut sos = self.sos.write().unwrap();
        match sos.iter_mut().find(|s| s.id.as_deref() == Some(id)) {
            Some(entry) => {
                entry.status = SosStatus::Resolved;
                entry.resolved_by = Some(resolved_by.to_string());
                entry.resolved_at = Some(resolved_at);
                Ok(())
            }
            None => Err(AppError::not_found(format!("sos {id}"))),
        }
    }

    async fn get_announcement(&self) -> AppResult<Option<Announcement>> {
        self.gate()?;
        Ok(self.announcement.read().unwrap().clone())
    }

    async fn set_announcement(&self, announcement: Announcement) -> AppResult<()> {
        self.gate()?;
        *self.announcement.write().unwrap() = Some(announcement);
        Ok(())
    }

    async fn get_app_settings(&self) -> AppResult<Option<AppSettings>> {
        self.gate()?;
        Ok(self.settings.read().unwrap().clone())
    }

    async fn push_tokens_for_roles(&self, roles: &[Role]) -> AppResult<Vec<String>> {
        self.gate()?;
        Ok(self
            .staff
            .iter()
            .filter(|p| roles.contains(&p.role))
            .filter_map(|p| p.expo_push_token.clone())
            .collect())
    }

    async fn push_tokens_except(&self, exclude_id: &str) -> AppResult<Vec<String>> {
        self.gate()?;
        Ok(self
            .staff
            .iter()
            .filter(|p| p.id != exclude_id)
            .filter_map(|p| p.expo_push_token.clone())
            .collect())
    }
}
