//! The session store — bounded per-session exchange history with
//! inactivity-based expiry.
//!
//! One mutex guards the whole session map, so a session's history and its
//! last-activity timestamp are always observed together. A background
//! reaper task sweeps expired sessions on a fixed interval; the write and
//! enumeration paths also sweep opportunistically so counts stay fresh
//! between reaper ticks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::MemoryConfig;
use crate::types::{Exchange, Message, SessionInfo};

// ─────────────────────────────────────────────
// Session entry
// ─────────────────────────────────────────────

/// One session's state: its history and when it was last touched.
///
/// History and timestamp live in a single map entry, so they are created
/// and destroyed together by construction.
#[derive(Clone, Debug)]
struct SessionEntry {
    history: Vec<Exchange>,
    last_activity: DateTime<Utc>,
}

impl SessionEntry {
    fn new(now: DateTime<Utc>) -> Self {
        SessionEntry {
            history: Vec::new(),
            last_activity: now,
        }
    }
}

// ─────────────────────────────────────────────
// Shared state (store ↔ reaper)
// ─────────────────────────────────────────────

/// State shared between the store handle and the reaper task.
struct Shared {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    session_timeout: chrono::Duration,
}

impl Shared {
    /// Lock the session map, recovering from poisoning.
    ///
    /// A panicking caller must not take the reaper (or other callers) down
    /// with it; the map itself is always structurally valid.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove every session idle for longer than the timeout.
    ///
    /// Strict inequality: a session at exactly the timeout is not yet
    /// expired. Returns the number of sessions removed.
    fn sweep(&self) -> usize {
        let mut sessions = self.lock();
        Self::sweep_locked(&mut sessions, Utc::now(), self.session_timeout)
    }

    /// Sweep an already-locked map. Shared by the reaper and the inline
    /// call sites so both use identical expiry semantics.
    fn sweep_locked(
        sessions: &mut HashMap<String, SessionEntry>,
        now: DateTime<Utc>,
        timeout: chrono::Duration,
    ) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.last_activity <= timeout);
        before - sessions.len()
    }
}

// ─────────────────────────────────────────────
// SessionStore
// ─────────────────────────────────────────────

/// In-memory, self-expiring conversation store.
///
/// Keeps a bounded, ordered exchange history per session and expires
/// sessions after `session_timeout` of inactivity. All operations are
/// synchronous and in-memory; the only background work is the reaper task
/// spawned at construction (callers must be inside a tokio runtime).
///
/// No state survives the process — that is intentional.
pub struct SessionStore {
    shared: Arc<Shared>,
    /// Read on every write, so changes apply to the next `add_exchange`.
    max_history: AtomicUsize,
    shutdown: Arc<Notify>,
    reaper: Mutex<Option<JoinHandle<()>>>,
}

impl SessionStore {
    /// Build a store from configuration and start its reaper.
    ///
    /// The cleanup interval is clamped to the configured minimum, the
    /// history limit to at least one entry, and the timeout to its cap.
    pub fn new(config: &MemoryConfig) -> Self {
        Self::from_parts(
            chrono::Duration::minutes(config.effective_session_timeout_minutes()),
            Duration::from_secs(config.effective_cleanup_interval_seconds()),
            config.effective_max_history(),
        )
    }

    fn from_parts(
        session_timeout: chrono::Duration,
        cleanup_interval: Duration,
        max_history: usize,
    ) -> Self {
        let shared = Arc::new(Shared {
            sessions: Mutex::new(HashMap::new()),
            session_timeout,
        });
        let shutdown = Arc::new(Notify::new());
        let reaper = tokio::spawn(reaper_loop(
            shared.clone(),
            shutdown.clone(),
            cleanup_interval,
        ));

        SessionStore {
            shared,
            max_history: AtomicUsize::new(max_history),
            shutdown,
            reaper: Mutex::new(Some(reaper)),
        }
    }

    /// Append a question/answer pair to a session's history.
    ///
    /// Creates the session if absent, refreshes its activity timestamp,
    /// and truncates the history from the front when it exceeds the
    /// current limit. Also sweeps expired sessions opportunistically, so
    /// unrelated stale sessions may disappear as a byproduct.
    pub fn add_exchange(
        &self,
        session_id: &str,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) {
        let limit = self.max_history.load(Ordering::Relaxed);
        let now = Utc::now();
        let mut sessions = self.shared.lock();

        // Refresh before the sweep so a stale session that is being
        // written to right now keeps its history.
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry::new(now))
            .last_activity = now;

        Shared::sweep_locked(&mut sessions, now, self.shared.session_timeout);

        if let Some(entry) = sessions.get_mut(session_id) {
            entry.history.push(Exchange::new(question, answer));
            if entry.history.len() > limit {
                let excess = entry.history.len() - limit;
                entry.history.drain(..excess);
            }
        }
    }

    /// Get a session's history, oldest exchange first.
    ///
    /// Reading an existing session refreshes its activity timestamp.
    /// A missing session yields an empty vec and is never created.
    pub fn get_history(&self, session_id: &str) -> Vec<Exchange> {
        let mut sessions = self.shared.lock();
        match sessions.get_mut(session_id) {
            Some(entry) => {
                entry.last_activity = Utc::now();
                entry.history.clone()
            }
            None => Vec::new(),
        }
    }

    /// Get a session's history as role-tagged messages for the generation
    /// pipeline: each exchange becomes user(question) then assistant(answer).
    ///
    /// Refreshes the activity timestamp like [`get_history`](Self::get_history).
    pub fn get_generation_format(&self, session_id: &str) -> Vec<Message> {
        let mut sessions = self.shared.lock();
        match sessions.get_mut(session_id) {
            Some(entry) => {
                entry.last_activity = Utc::now();
                entry
                    .history
                    .iter()
                    .flat_map(|exchange| {
                        [
                            Message::user(exchange.question.clone()),
                            Message::assistant(exchange.answer.clone()),
                        ]
                    })
                    .collect()
            }
            None => Vec::new(),
        }
    }

    /// Remove a session entirely. Returns whether it existed.
    ///
    /// Idempotent: clearing an unknown session is a no-op returning false.
    pub fn clear_session(&self, session_id: &str) -> bool {
        let removed = self.shared.lock().remove(session_id).is_some();
        if removed {
            debug!(session_id, "cleared session");
        }
        removed
    }

    /// Snapshot all live sessions' histories. Sweeps first, so the result
    /// reflects current expiry.
    pub fn get_all_sessions(&self) -> HashMap<String, Vec<Exchange>> {
        let mut sessions = self.shared.lock();
        Shared::sweep_locked(&mut sessions, Utc::now(), self.shared.session_timeout);
        sessions
            .iter()
            .map(|(id, entry)| (id.clone(), entry.history.clone()))
            .collect()
    }

    /// Number of live sessions, after sweeping expired ones.
    pub fn session_count(&self) -> usize {
        let mut sessions = self.shared.lock();
        Shared::sweep_locked(&mut sessions, Utc::now(), self.shared.session_timeout);
        sessions.len()
    }

    /// Metadata for one session without touching its activity timestamp.
    ///
    /// `is_active` is evaluated live against the timeout, so an aged-out
    /// session that the reaper has not reached yet reports `exists: true,
    /// is_active: false`.
    pub fn get_session_info(&self, session_id: &str) -> SessionInfo {
        let sessions = self.shared.lock();
        match sessions.get(session_id) {
            Some(entry) => SessionInfo {
                exists: true,
                message_count: entry.history.len(),
                last_activity: Some(entry.last_activity),
                is_active: Utc::now() - entry.last_activity < self.shared.session_timeout,
            },
            None => SessionInfo::missing(),
        }
    }

    /// Run an expiry sweep now. Returns the number of sessions removed.
    ///
    /// Same semantics as the reaper's periodic sweep — only the frequency
    /// of invocation differs.
    pub fn sweep_inactive(&self) -> usize {
        self.shared.sweep()
    }

    /// Current history limit.
    pub fn max_history(&self) -> usize {
        self.max_history.load(Ordering::Relaxed)
    }

    /// Change the history limit. Applies on the next write; existing
    /// histories are not retrimmed until then.
    pub fn set_max_history(&self, limit: usize) {
        self.max_history.store(limit.max(1), Ordering::Relaxed);
    }

    /// Signal the reaper to terminate. Clears no session state.
    ///
    /// Idempotent. `notify_one` stores a permit, so a stop issued while
    /// the reaper is mid-sweep is not lost.
    pub fn stop(&self) {
        self.shutdown.notify_one();
    }

    /// Stop the reaper and wait for it to finish.
    pub async fn shutdown(&self) {
        self.stop();
        let handle = {
            let mut reaper = self.reaper.lock().unwrap_or_else(PoisonError::into_inner);
            reaper.take()
        };
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        // The reaper holds its own Arc<Shared>; signal it so the task does
        // not outlive the store.
        self.shutdown.notify_one();
    }
}

// ─────────────────────────────────────────────
// Reaper
// ─────────────────────────────────────────────

/// Periodic sweep loop, cancelled via the shutdown notify.
///
/// Each iteration sweeps first, then waits out the interval. The timed
/// wait is itself cancellable, so a stop signal is honored without
/// waiting out the full interval. Nothing inside a sweep can fail: lock
/// poisoning is recovered in `Shared::lock`, so the loop only ever exits
/// through the shutdown signal.
async fn reaper_loop(shared: Arc<Shared>, shutdown: Arc<Notify>, interval: Duration) {
    debug!(interval_ms = interval.as_millis() as u64, "session reaper started");

    loop {
        let removed = shared.sweep();
        if removed > 0 {
            debug!(removed, "reaper removed inactive sessions");
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.notified() => {
                debug!("session reaper shutting down");
                return;
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
