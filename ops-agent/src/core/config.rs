//! Agent configuration
//!
//! Every setting comes from an environment variable with a sensible
//! default:
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/ops-agent | queue database and logs |
//! | REMOTE_URL | http://localhost:3001 | remote store base URL |
//! | PUSH_ENDPOINT | https://exp.host/--/api/v2/push/send | push relay |
//! | REQUEST_TIMEOUT_MS | 30000 | per-request HTTP timeout |
//! | SYNC_SCAN_INTERVAL_SECS | 60 | periodic drain interval |
//! | APP_VERSION | crate version | version reported to the update gate |

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for the queue database and log files
    pub work_dir: String,
    /// Base URL of the remote store API
    pub remote_url: String,
    /// Push relay endpoint, one POST per target token
    pub push_endpoint: String,
    /// Per-request HTTP timeout (milliseconds)
    pub request_timeout_ms: u64,
    /// Periodic drain interval (seconds)
    pub sync_scan_interval_secs: u64,
    /// Version string reported against the remote minimum-version gate
    pub app_version: String,
}

impl Config {
    /// Load configuration from environment variables, with defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/ops-agent".into()),
            remote_url: std::env::var("REMOTE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".into()),
            push_endpoint: std::env::var("PUSH_ENDPOINT")
                .unwrap_or_else(|_| "https://exp.host/--/api/v2/push/send".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30000),
            sync_scan_interval_secs: std::env::var("SYNC_SCAN_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            app_version: std::env::var("APP_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").into()),
        }
    }

    /// Path of the offline queue database.
    pub fn queue_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("pending_reports.redb")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
