//! Remote document/blob store client
//!
//! The backend is consumed only through the [`RemoteStore`] trait; the
//! engine never sees a concrete wire format. [`HttpRemoteStore`] talks to
//! the real document API over HTTPS, [`MemoryRemoteStore`] backs tests and
//! local development.

pub mod http;
pub mod memory;
pub mod store;

pub use http::HttpRemoteStore;
pub use memory::MemoryRemoteStore;
pub use store::RemoteStore;
