//! Daily attendance and the security shift-window gate
//!
//! Check-ins write `attendance/{date}_{userId}` — the deterministic key
//! makes repeated check-ins idempotent overwrites, never duplicates.
//!
//! Shift gating applies to the security division only: a report is
//! rejected unless the submitter's resolved shift contains the current
//! wall-clock hour. Between midnight and 07:00 the resolver also looks at
//! the previous day's record, because a night-shift guard who checked in
//! yesterday evening is still on duty.

use shared::models::{
    AttendanceRecord, AttendanceStatus, Division, Shift, StaffProfile, attendance_key,
};
use shared::{AppError, AppResult};
use std::sync::Arc;

use crate::remote::RemoteStore;

/// Day shift may report 05:00-19:00.
const PAGI_START_HOUR: u32 = 5;
const PAGI_END_HOUR: u32 = 19;
/// Night shift may report from 17:00 until 07:00 the next day.
const MALAM_START_HOUR: u32 = 17;
const MALAM_END_HOUR: u32 = 7;

/// Whether `shift` permits activity at the given wall-clock hour.
pub fn shift_allows(shift: Shift, hour: u32) -> bool {
    match shift {
        Shift::Pagi => (PAGI_START_HOUR..PAGI_END_HOUR).contains(&hour),
        Shift::Malam => hour >= MALAM_START_HOUR || hour <= MALAM_END_HOUR,
        Shift::NonShift => true,
    }
}

/// Resolve the shift a staff member is currently working.
///
/// Today's attendance record wins. With no record and the clock between
/// 00:00-07:00, yesterday's record counts if (and only if) it was Malam.
pub async fn resolve_shift(
    store: &dyn RemoteStore,
    user_id: &str,
    date: &str,
    hour: u32,
) -> AppResult<Option<Shift>> {
    if let Some(record) = store.get_attendance(&attendance_key(date, user_id)).await? {
        return Ok(Some(record.shift));
    }

    if hour <= MALAM_END_HOUR
        && let Some(yesterday) = shared::util::previous_date(date)
        && let Some(record) = store
            .get_attendance(&attendance_key(&yesterday, user_id))
            .await?
        && record.shift == Shift::Malam
    {
        return Ok(Some(Shift::Malam));
    }

    Ok(None)
}

/// Reject a report submission outside the submitter's duty window.
///
/// Non-security divisions always pass. Errors here are business-rule
/// rejections: surfaced immediately, never retried, never queued.
pub async fn check_report_window(
    store: &dyn RemoteStore,
    profile: &StaffProfile,
    date: &str,
    hour: u32,
) -> AppResult<()> {
    if profile.division != Division::Security {
        return Ok(());
    }

    let shift = resolve_shift(store, &profile.id, date, hour)
        .await?
        .ok_or_else(|| AppError::business_rule("Not checked in today"))?;

    if !shift_allows(shift, hour) {
        return Err(AppError::business_rule(format!(
            "Outside duty hours for shift {shift:?}"
        )));
    }
    Ok(())
}

/// Attendance operations against the remote store.
#[derive(Clone)]
pub struct AttendanceService {
    store: Arc<dyn RemoteStore>,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Self check-in for today. Security staff pick their shift; everyone
    /// else is recorded Non-Shift regardless of `shift_choice`.
    pub async fn check_in(
        &self,
        profile: &StaffProfile,
        shift_choice: Option<Shift>,
    ) -> AppResult<AttendanceRecord> {
        self.check_in_at(profile, shift_choice, &shared::util::today_local())
            .await
    }

    pub async fn check_in_at(
        &self,
        profile: &StaffProfile,
        shift_choice: Option<Shift>,
        date: &str,
    ) -> AppResult<AttendanceRecord> {
        let shift = if profile.division == Division::Security {
            shift_choice.unwrap_or(Shift::Pagi)
        } else {
            Shift::NonShift
        };

        let record = AttendanceRecord {
            user_id: profile.id.clone(),
            user_name: profile.name.clone(),
            user_division: profile.division,
            date: date.to_string(),
            status: AttendanceStatus::Hadir,
            shift,
            recorded_at: shared::util::now_millis(),
            updated_by: "Self".to_string(),
        };

        self.store
            .put_attendance(&attendance_key(date, &profile.id), record.clone())
            .await?;
        Ok(record)
    }

    /// A leader marks a team member's attendance for today.
    ///
    /// Management roles may mark anyone; commanders and koordinators only
    /// their own division. `shift` matters only for security members being
    /// marked present.
    pub async fn mark_member(
        &self,
        leader: &StaffProfile,
        member: &StaffProfile,
        status: AttendanceStatus,
        shift: Option<Shift>,
    ) -> AppResult<AttendanceRecord> {
        self.mark_member_at(leader, member, status, shift, &shared::util::today_local())
            .await
    }

    pub async fn mark_member_at(
        &self,
        leader: &StaffProfile,
        member: &StaffProfile,
        status: AttendanceStatus,
        shift: Option<Shift>,
        date: &str,
    ) -> AppResult<AttendanceRecord> {
        if !leader.role.is_leader() {
            return Err(AppError::unauthorized(
                "Only leaders may mark attendance for others",
            ));
        }
        if !leader.role.is_management() && leader.division != member.division {
            return Err(AppError::unauthorized(
                "Leaders may only mark members of their own division",
            ));
        }

        let shift = match (member.division, status) {
            (Division::Security, AttendanceStatus::Hadir) => shift.unwrap_or(Shift::Pagi),
            _ => Shift::NonShift,
        };

        let record = AttendanceRecord {
            user_id: member.id.clone(),
            user_name: member.name.clone(),
            user_division: member.division,
            date: date.to_string(),
            status,
            shift,
            recorded_at: shared::util::now_millis(),
            updated_by: leader.name.clone(),
        };

        self.store
            .put_attendance(&attendance_key(date, &member.id), record.clone())
            .await?;
        Ok(record)
    }

    /// Whether the member has an attendance record for `date`.
    pub async fn has_checked_in(&self, user_id: &str, date: &str) -> AppResult<bool> {
        Ok(self
            .store
            .get_attendance(&attendance_key(date, user_id))
            .await?
            .is_some())
    }
}
