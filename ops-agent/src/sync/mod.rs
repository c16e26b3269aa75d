//! Offline-to-remote sync: drain engine plus its background worker

mod engine;
mod worker;

pub use engine::{SyncEngine, SyncOutcome};
pub use worker::SyncWorker;
