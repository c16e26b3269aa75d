//! SOS model
//!
//! System-wide emergency broadcast. Records are append-only: an SOS is
//! resolved in place, never deleted, leaving an audit trail. At most one
//! ACTIVE record should exist at a time (enforced by a check-then-act
//! query, not by the store — see the engine's SOS service).

use serde::{Deserialize, Serialize};

use crate::models::Division;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SosStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "RESOLVED")]
    Resolved,
}

/// SOS document (`active_sos/{autoId}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSos {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub raiser_id: String,
    pub raiser_name: String,
    pub raiser_division: Division,
    pub status: SosStatus,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<i64>,
}
