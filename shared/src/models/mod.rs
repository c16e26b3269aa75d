//! Data models
//!
//! Shared between the device agent and the remote document store. Field
//! names are the wire format (serde snake_case strings throughout).

pub mod announcement;
pub mod attendance;
pub mod push;
pub mod report;
pub mod sos;
pub mod staff;

// Re-exports
pub use announcement::*;
pub use attendance::*;
pub use push::*;
pub use report::*;
pub use sos::*;
pub use staff::*;
