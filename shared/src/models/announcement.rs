//! App-config documents

use serde::{Deserialize, Serialize};

/// Banner announcement (`app_config/announcement`) — a single mutable
/// document, editable by management roles only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub text: String,
    pub updated_by: String,
    pub updated_at: i64,
}

/// Version gate (`app_config/settings`). Clients below `minimum_version`
/// must block on a hard "update required" screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub minimum_version: String,
}
