//! Configuration system — schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use chatmem_core::config;
//!
//! let cfg = config::load_or_default(None);
//! println!("Timeout: {} min", cfg.session_timeout_minutes);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{load, load_or_default, save, ConfigError};
pub use schema::{MemoryConfig, MIN_CLEANUP_INTERVAL_SECONDS};
