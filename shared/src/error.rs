//! Unified error handling
//!
//! One application error enum shared by the whole workspace. Variants map
//! to how a failure is handled, not where it came from:
//!
//! | Variant | Handling |
//! |---------|----------|
//! | `Network` | transient — record goes to the offline queue, retried on sync |
//! | `AssetUnavailable` | fatal for that record — retry cannot restore a missing file |
//! | `Storage` | local queue I/O error — surfaced, never retried |
//! | `Unauthorized` / `BusinessRule` | rejected synchronously, no retry |

use thiserror::Error;

/// Application error enum
#[derive(Debug, Error)]
pub enum AppError {
    // ========== Transient (retried via offline queue) ==========
    #[error("Network error: {0}")]
    Network(String),

    // ========== Local resource failures (fatal per record) ==========
    #[error("Local asset unavailable: {0}")]
    AssetUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // ========== Authorization / business-rule rejections ==========
    #[error("Permission denied: {0}")]
    Unauthorized(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== Generic ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

// ========== Helper Constructors ==========

impl AppError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn asset_unavailable(msg: impl Into<String>) -> Self {
        Self::AssetUnavailable(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the failed operation may succeed on a later retry.
    ///
    /// Only transient network failures qualify: a missing local asset or a
    /// rejected business rule will fail identically next time.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
