//! System-wide SOS broadcast
//!
//! At most one ACTIVE alert exists at a time. The gate is a read of the
//! current active alert before the append; the record trail itself is
//! append-only, resolved alerts stay behind as audit history.

use shared::models::{ActiveSos, SosStatus, StaffProfile};
use shared::{AppError, AppResult};
use std::sync::Arc;

use crate::notify::PushDispatcher;
use crate::remote::RemoteStore;

/// Whether `actor` may resolve `alert`. The raiser always can; otherwise
/// management level is required.
pub fn can_resolve(actor: &StaffProfile, alert: &ActiveSos) -> bool {
    alert.raiser_id == actor.id || actor.role.is_management()
}

#[derive(Clone)]
pub struct SosService {
    store: Arc<dyn RemoteStore>,
    push: Option<PushDispatcher>,
}

impl SosService {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store, push: None }
    }

    /// Alarm every other unit when an alert is raised.
    pub fn with_push(mut self, push: PushDispatcher) -> Self {
        self.push = Some(push);
        self
    }

    /// The currently active alert, if any.
    pub async fn active(&self) -> AppResult<Option<ActiveSos>> {
        self.store.active_sos().await
    }

    /// Raise a new alert. Conflicts while another alert is still active.
    pub async fn trigger(&self, raiser: &StaffProfile) -> AppResult<ActiveSos> {
        if let Some(existing) = self.store.active_sos().await? {
            return Err(AppError::conflict(format!(
                "An SOS is already active, raised by {}",
                existing.raiser_name
            )));
        }

        let alert = ActiveSos {
            id: None,
            raiser_id: raiser.id.clone(),
            raiser_name: raiser.name.clone(),
            raiser_division: raiser.division,
            status: SosStatus::Active,
            created_at: shared::util::now_millis(),
            resolved_by: None,
            resolved_at: None,
        };
        let id = self.store.add_sos(alert.clone()).await?;
        tracing::warn!(raiser = %raiser.name, sos_id = %id, "SOS raised");

        if let Some(push) = &self.push {
            push.notify_sos(self.store.as_ref(), raiser).await?;
        }

        Ok(ActiveSos {
            id: Some(id),
            ..alert
        })
    }

    /// Stand down the active alert. Only the raiser or management may.
    pub async fn resolve(&self, actor: &StaffProfile) -> AppResult<()> {
        let alert = self
            .store
            .active_sos()
            .await?
            .ok_or_else(|| AppError::not_found("No active SOS"))?;

        if !can_resolve(actor, &alert) {
            return Err(AppError::unauthorized(
                "Only the raiser or management may resolve an SOS",
            ));
        }

        let id = alert
            .id
            .ok_or_else(|| AppError::internal("Active SOS record has no id"))?;
        self.store
            .resolve_sos(&id, &actor.id, shared::util::now_millis())
            .await?;
        tracing::info!(resolver = %actor.name, sos_id = %id, "SOS resolved");
        Ok(())
    }
}
