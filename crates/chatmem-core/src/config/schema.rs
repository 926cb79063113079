//! Configuration schema for the memory store.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

/// Floor applied to `cleanup_interval_seconds` at store construction.
pub const MIN_CLEANUP_INTERVAL_SECONDS: u64 = 5;

/// Cap applied to `session_timeout_minutes` at store construction, keeping
/// timeout arithmetic within `chrono::Duration` range (ten years).
pub const MAX_SESSION_TIMEOUT_MINUTES: u64 = 60 * 24 * 365 * 10;

/// Memory store configuration — session expiry and history bounds.
///
/// `max_history_per_session` is consulted on every write, not cached at
/// construction, so a runtime change takes effect on the next write
/// (see [`SessionStore::set_max_history`](crate::SessionStore::set_max_history)).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryConfig {
    /// Minutes of inactivity after which a session is eligible for removal.
    pub session_timeout_minutes: u64,
    /// Seconds between reaper sweeps. Clamped to at least
    /// [`MIN_CLEANUP_INTERVAL_SECONDS`] when the store is built.
    pub cleanup_interval_seconds: u64,
    /// Maximum retained exchanges per session; older entries are dropped.
    pub max_history_per_session: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            session_timeout_minutes: 30,
            cleanup_interval_seconds: 60,
            max_history_per_session: 50,
        }
    }
}

impl MemoryConfig {
    /// Cleanup interval with the minimum floor applied.
    pub fn effective_cleanup_interval_seconds(&self) -> u64 {
        self.cleanup_interval_seconds.max(MIN_CLEANUP_INTERVAL_SECONDS)
    }

    /// History limit, never below one entry.
    pub fn effective_max_history(&self) -> usize {
        self.max_history_per_session.max(1)
    }

    /// Session timeout with the cap applied, as a signed minute count.
    pub fn effective_session_timeout_minutes(&self) -> i64 {
        self.session_timeout_minutes.min(MAX_SESSION_TIMEOUT_MINUTES) as i64
    }
}
