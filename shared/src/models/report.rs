//! Report models
//!
//! Two forms of the same report: [`SubmissionRecord`] is the device-local
//! form that sits in the offline queue, [`RemoteReport`] is the persisted
//! form written to the remote store after a successful upload.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::Division;

/// Tag for queued record kinds. Only reports are queued today; the tag
/// keeps the queue format open for other record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    #[serde(rename = "REPORT")]
    Report,
}

/// A report created on-device, queued or in flight.
///
/// Invariant: a queued record always references a local asset path — it is
/// never queued with a remote URL. Its lifecycle status is implicit:
/// `pending_local` while in the queue, gone on confirmed remote persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub kind: RecordKind,
    /// Client-side ID, assigned at creation
    pub client_record_id: String,
    // Immutable snapshot of the submitter at creation time
    pub requester_id: String,
    pub requester_name: String,
    pub requester_division: Division,
    // Chosen from the location catalog
    pub location_id: String,
    pub location_name: String,
    /// Free text, non-empty
    pub description: String,
    /// Photo stored on-device, owned exclusively until uploaded
    pub local_asset_ref: PathBuf,
    /// Client clock at creation — only meaningful before the server
    /// timestamp is assigned
    pub created_at_local: i64,
}

/// Provenance tag on persisted reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    /// Replayed from the offline queue
    OfflineSync,
}

/// Persisted report document (`reports/{autoId}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteReport {
    pub user_id: String,
    pub user_name: String,
    pub user_division: Division,
    pub location_id: String,
    pub location_name: String,
    pub description: String,
    /// Remote blob URL of the uploaded photo
    pub photo_url: String,
    /// Calendar date (`YYYY-MM-DD`) at persistence time
    pub date: String,
    /// Server-side timestamp (millis)
    pub submitted_at: i64,
    /// Absent for direct submissions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ReportSource>,
}

/// Receipt returned by the remote store on successful submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteReceipt {
    pub report_id: String,
    pub photo_url: String,
}

/// An entry in the device's cached location catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
}
