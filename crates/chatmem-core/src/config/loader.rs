//! Config loader — reads a JSON config file and merges env var overrides.
//!
//! # Loading precedence
//! 1. Defaults (from `MemoryConfig::default()`)
//! 2. JSON file (if a path is given and the file exists)
//! 3. Environment variables `CHATMEM_<FIELD>` (override JSON)
//!
//! Two entry points:
//! - [`load`] fails loudly — for two-phase startup where a broken config
//!   file should abort before the store is ever constructed.
//! - [`load_or_default`] logs and falls back — the explicit
//!   "no configuration" mode; it never fails.

use std::path::Path;

use tracing::{debug, info, warn};

use super::schema::MemoryConfig;

/// Errors from the fail-loud config path.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load configuration from `path`, then apply env var overrides.
///
/// A missing file is not an error — defaults are used. A file that exists
/// but cannot be read or parsed is.
pub fn load(path: &Path) -> Result<MemoryConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Ok(apply_env_overrides(MemoryConfig::default()));
    }

    debug!("Loading config from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    let config: MemoryConfig = serde_json::from_str(&content)?;
    Ok(apply_env_overrides(config))
}

/// Load configuration, substituting defaults on any failure.
///
/// `None` skips the file entirely and uses defaults + env vars.
pub fn load_or_default(path: Option<&Path>) -> MemoryConfig {
    match path {
        Some(p) => load(p).unwrap_or_else(|e| {
            warn!("Config load failed ({e}), falling back to defaults");
            apply_env_overrides(MemoryConfig::default())
        }),
        None => apply_env_overrides(MemoryConfig::default()),
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save(config: &MemoryConfig, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    std::fs::write(path, json)?;
    debug!("Config saved to {}", path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Supported overrides:
/// - `CHATMEM_SESSION_TIMEOUT_MINUTES`
/// - `CHATMEM_CLEANUP_INTERVAL_SECONDS`
/// - `CHATMEM_MAX_HISTORY_PER_SESSION`
///
/// Unparseable values are ignored.
fn apply_env_overrides(mut config: MemoryConfig) -> MemoryConfig {
    if let Ok(val) = std::env::var("CHATMEM_SESSION_TIMEOUT_MINUTES") {
        if let Ok(n) = val.parse::<u64>() {
            config.session_timeout_minutes = n;
        }
    }
    if let Ok(val) = std::env::var("CHATMEM_CLEANUP_INTERVAL_SECONDS") {
        if let Ok(n) = val.parse::<u64>() {
            config.cleanup_interval_seconds = n;
        }
    }
    if let Ok(val) = std::env::var("CHATMEM_MAX_HISTORY_PER_SESSION") {
        if let Ok(n) = val.parse::<usize>() {
            config.max_history_per_session = n;
        }
    }
    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
