//! Duty status machine: break and permit requests, countdown, status end
//!
//! A staff member raises a request, which parks them in `Pending` until a
//! leader rules on it (see `approval`). An approved break carries an end
//! timestamp; the countdown helper floors at zero so an expired break
//! never renders as negative time remaining.

use shared::models::{DutyState, DutyStatus, RequestType, StaffProfile};
use shared::{AppError, AppResult};
use std::sync::Arc;

use crate::notify::PushDispatcher;
use crate::remote::RemoteStore;

/// Breaks run a fixed 40 minutes from the moment of approval.
pub const BREAK_DURATION_MINUTES: i64 = 40;

/// Canned reason attached to every break request.
pub const BREAK_REQUEST_REASON: &str = "Istirahat Rutin (40 Menit)";

/// Display state of the break countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining { minutes: i64, seconds: i64 },
    TimeUp,
}

/// Countdown toward the break end, floored at [`Countdown::TimeUp`] so an
/// expired break never shows negative time. `None` when the duty block
/// carries no end time.
pub fn break_countdown(duty: &DutyState, now_millis: i64) -> Option<Countdown> {
    let end = duty.status_end_time?;
    let remaining_secs = (end - now_millis) / 1000;
    if remaining_secs <= 0 {
        return Some(Countdown::TimeUp);
    }
    Some(Countdown::Remaining {
        minutes: remaining_secs / 60,
        seconds: remaining_secs % 60,
    })
}

#[derive(Clone)]
pub struct StatusService {
    store: Arc<dyn RemoteStore>,
    push: Option<PushDispatcher>,
}

impl StatusService {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store, push: None }
    }

    /// Notify the responsible leaders when a request is raised.
    pub fn with_push(mut self, push: PushDispatcher) -> Self {
        self.push = Some(push);
        self
    }

    /// Raise a break or permit request, parking the requester in Pending.
    ///
    /// Breaks always use the canned reason; permits must state their own.
    pub async fn request_leave(
        &self,
        profile: &StaffProfile,
        request_type: RequestType,
        reason: Option<String>,
    ) -> AppResult<DutyState> {
        if profile.duty.status != DutyStatus::Active {
            return Err(AppError::business_rule(
                "A new request requires active duty status",
            ));
        }

        let reason = match request_type {
            RequestType::Break => BREAK_REQUEST_REASON.to_string(),
            RequestType::Permit => reason
                .filter(|r| !r.trim().is_empty())
                .ok_or_else(|| AppError::validation("A permit request requires a reason"))?,
        };

        let duty = DutyState {
            status: DutyStatus::Pending,
            request_type: Some(request_type),
            request_reason: Some(reason),
            ..DutyState::active()
        };
        self.store.update_duty(&profile.id, duty.clone()).await?;

        if let Some(push) = &self.push {
            push.notify_request_raised(self.store.as_ref(), profile)
                .await?;
        }
        Ok(duty)
    }

    /// Return to active duty, clearing the whole status block.
    ///
    /// Ending is always self-service: a member on break, permit, or a
    /// substitution post ends it themselves, with no approver involved.
    pub async fn end_status(&self, profile: &StaffProfile) -> AppResult<DutyState> {
        match profile.duty.status {
            DutyStatus::Break | DutyStatus::Permit | DutyStatus::Replacing => {}
            DutyStatus::Active | DutyStatus::Pending => {
                return Err(AppError::business_rule("No active status to end"));
            }
        }

        let duty = DutyState::active();
        self.store.update_duty(&profile.id, duty.clone()).await?;
        Ok(duty)
    }
}
