//! Attendance model
//!
//! One record per staff member per local calendar day, keyed
//! `{date}_{userId}` so repeated check-ins are idempotent overwrites.

use serde::{Deserialize, Serialize};

use crate::models::Division;

/// Daily attendance status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Present
    Hadir,
    /// Sick
    Sakit,
    /// Excused absence
    Izin,
    /// Unexcused absence
    Alpha,
}

/// Duty shift — only the security division works shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shift {
    /// Day shift, reporting window 05:00-19:00
    Pagi,
    /// Night shift, reporting window 17:00-07:00 next day
    Malam,
    #[serde(rename = "Non-Shift")]
    NonShift,
}

/// Attendance document (`attendance/{date}_{userId}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub user_id: String,
    pub user_name: String,
    pub user_division: Division,
    /// Local calendar date `YYYY-MM-DD`
    pub date: String,
    pub status: AttendanceStatus,
    pub shift: Shift,
    /// Record timestamp (millis)
    pub recorded_at: i64,
    /// `"Self"` for self check-in, otherwise the marking leader's name
    pub updated_by: String,
}

/// Deterministic attendance document key.
pub fn attendance_key(date: &str, user_id: &str) -> String {
    format!("{date}_{user_id}")
}
