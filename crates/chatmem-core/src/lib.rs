//! chatmem-core — in-process, time-bounded conversation memory.
//!
//! A concurrent, self-expiring session store for chat applications: each
//! session keeps a bounded, ordered question/answer history, sessions
//! expire after a period of inactivity, and history can be rendered as
//! role-tagged messages for a downstream generation pipeline.
//!
//! # Usage
//! ```no_run
//! use chatmem_core::{config, SessionStore};
//!
//! # async fn example() {
//! let cfg = config::load_or_default(None);
//! let store = SessionStore::new(&cfg);
//!
//! store.add_exchange("session-1", "What is Rust?", "A systems language.");
//! let context = store.get_generation_format("session-1");
//! # let _ = context;
//! # store.shutdown().await;
//! # }
//! ```

pub mod config;
pub mod session;
pub mod types;

pub use session::SessionStore;
pub use types::{Exchange, Message, SessionInfo};
