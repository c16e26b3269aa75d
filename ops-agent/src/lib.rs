//! Field-operations device agent
//!
//! The device-side engine behind an attendance/reporting app for field
//! staff: photo reports survive connectivity loss in a durable on-device
//! queue and are replayed against the remote store when the network
//! returns; break/permit requests route to the supervisors a role table
//! authorizes, and approvals drive the requester's (and sometimes the
//! approver's) duty status.
//!
//! Module map:
//! - [`queue`] — redb-backed offline queue (append / read-all / replace-all)
//! - [`remote`] — document/blob store client (`RemoteStore` trait + HTTP
//!   and in-memory implementations)
//! - [`submit`] — report submission: direct path with offline fallback
//! - [`connectivity`] — reachability watch channel
//! - [`sync`] — queue drain engine and its background worker
//! - [`approval`] — role/division routing table and approval side effects
//! - [`status`] — duty status transitions and the break countdown
//! - [`attendance`] — daily check-in and the security shift window gate
//! - [`sos`] — emergency broadcast lifecycle
//! - [`appconfig`] — announcement banner and the minimum-version gate
//! - [`locations`] — location catalog with an offline cache
//! - [`notify`] — push-relay dispatch

pub mod appconfig;
pub mod approval;
pub mod attendance;
pub mod connectivity;
pub mod core;
pub mod locations;
pub mod notify;
pub mod queue;
pub mod remote;
pub mod sos;
pub mod status;
pub mod submit;
pub mod sync;

// Re-exports
pub use crate::core::config::Config;
pub use crate::core::logger::init_logger;
pub use crate::core::state::AgentState;
