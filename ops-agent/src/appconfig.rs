//! Announcement banner and app settings
//!
//! The announcement is a single document replaced wholesale on edit.
//! The settings document carries the minimum supported client version;
//! a client below it is told to update before doing anything else.

use shared::models::{Announcement, AppSettings, StaffProfile};
use shared::{AppError, AppResult};
use std::sync::Arc;

use crate::remote::RemoteStore;

/// Numeric dotted-version comparison: `current` satisfies `minimum` when
/// it is segment-wise greater or equal. Missing segments count as zero,
/// non-numeric segments as zero too ("1.2.beta" compares as "1.2.0").
pub fn version_supported(current: &str, minimum: &str) -> bool {
    let parse = |v: &str| -> Vec<u64> {
        v.split('.')
            .map(|s| s.trim().parse::<u64>().unwrap_or(0))
            .collect()
    };
    let cur = parse(current);
    let min = parse(minimum);
    let len = cur.len().max(min.len());
    for i in 0..len {
        let c = cur.get(i).copied().unwrap_or(0);
        let m = min.get(i).copied().unwrap_or(0);
        if c != m {
            return c > m;
        }
    }
    true
}

#[derive(Clone)]
pub struct AppConfigService {
    store: Arc<dyn RemoteStore>,
}

impl AppConfigService {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    pub async fn announcement(&self) -> AppResult<Option<Announcement>> {
        self.store.get_announcement().await
    }

    /// Replace the announcement banner. Management only.
    pub async fn set_announcement(
        &self,
        editor: &StaffProfile,
        text: String,
    ) -> AppResult<Announcement> {
        if !editor.role.is_management() {
            return Err(AppError::unauthorized(
                "Only management may edit the announcement",
            ));
        }

        let announcement = Announcement {
            text,
            updated_by: editor.name.clone(),
            updated_at: shared::util::now_millis(),
        };
        self.store.set_announcement(announcement.clone()).await?;
        Ok(announcement)
    }

    /// Whether `current_version` meets the remotely configured minimum.
    /// Absent settings mean no gate.
    pub async fn check_version(&self, current_version: &str) -> AppResult<bool> {
        let Some(settings) = self.store.get_app_settings().await? else {
            return Ok(true);
        };
        Ok(version_supported(current_version, &settings.minimum_version))
    }

    pub async fn settings(&self) -> AppResult<Option<AppSettings>> {
        self.store.get_app_settings().await
    }
}
