//! Staff profile model
//!
//! A staff member's identity (division + role) plus the duty state embedded
//! on the profile document. The duty state is the single source of truth
//! for a member's current status: exactly one of active / pending / break /
//! permit / replacing holds at any time, and transitions replace the whole
//! block rather than patching individual fields.

use serde::{Deserialize, Serialize};

/// Organizational unit (divisi)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Division {
    Security,
    Cleaning,
    Driver,
    Maintenance,
    Pantry,
    Management,
    Umum,
    StafTu,
    StafUmum,
    StafLogistik,
    #[serde(alias = "staf_perlengkapan")]
    StafPerkap,
}

/// Hierarchical position (jabatan)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Staf,
    Kasubag,
    KasubagUmum,
    KasubagLogistik,
    KabagTu,
    Commander,
    Koordinator,
}

impl Role {
    /// Management-level roles: may resolve any SOS, edit the announcement
    /// banner, and see every team member's attendance.
    pub fn is_management(&self) -> bool {
        matches!(
            self,
            Role::Kasubag | Role::KasubagUmum | Role::KasubagLogistik | Role::KabagTu
        )
    }

    /// Roles allowed to mark attendance for other staff.
    pub fn is_leader(&self) -> bool {
        self.is_management() || matches!(self, Role::Commander | Role::Koordinator)
    }
}

/// Duty status of a staff member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyStatus {
    #[default]
    Active,
    Pending,
    Break,
    Permit,
    Replacing,
}

/// Kind of leave being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Break,
    Permit,
}

/// The duty-state block embedded on a staff profile.
///
/// `status_end_time` is set only at approval time — the break clock does
/// not start until a supervisor acts on the request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DutyState {
    #[serde(default)]
    pub status: DutyStatus,
    /// Set while `status == pending`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<RequestType>,
    /// Canned string for break requests, free text for permits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_reason: Option<String>,
    /// Break end timestamp (millis), present only while `status == break`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_end_time: Option<i64>,
    /// Name of the approver, set on transition into break/permit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    /// Set only when an approver's own status becomes `replacing`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacing_who: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacing_reason: Option<String>,
}

impl DutyState {
    /// Fresh on-duty state with no pending request.
    pub fn active() -> Self {
        Self::default()
    }
}

/// Staff profile document (`users/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffProfile {
    pub id: String,
    pub name: String,
    pub division: Division,
    pub role: Role,
    #[serde(default)]
    pub total_points: i64,
    /// Push-relay token for notification dispatch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expo_push_token: Option<String>,
    #[serde(flatten)]
    pub duty: DutyState,
}

impl StaffProfile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        division: Division,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            division,
            role,
            total_points: 0,
            expo_push_token: None,
            duty: DutyState::active(),
        }
    }
}
