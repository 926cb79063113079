//! Session store — bounded in-memory history with inactivity expiry.
//!
//! The store is purely in-memory and intentionally loses all state when
//! the process exits. Sessions are created implicitly on first write and
//! removed either explicitly (`clear_session`) or by the expiry sweep.

pub mod store;

pub use store::SessionStore;
