//! Shared types for the field-operations agent
//!
//! Domain models, the error taxonomy, and small time/ID utilities used by
//! every crate in the workspace. Pure data — no I/O lives here.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult};
pub use serde::{Deserialize, Serialize};
