//! Server configuration resolution
//!
//! Every tunable resolves with the same priority order:
//! 1. Environment variable (highest priority)
//! 2. TOML config file (`<config dir>/labelq/config.toml`)
//! 3. Compiled default (fallback)

use crate::{Error, Result};
use std::path::PathBuf;

/// Default bind address for labelq-server
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5810";

/// Default assignment lease duration in minutes
///
/// An interaction left in `started` state longer than this becomes
/// eligible for re-assignment to the same user.
pub const DEFAULT_LEASE_MINUTES: i64 = 15;

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Directory holding the SQLite database file
    pub data_dir: PathBuf,
    /// Assignment lease duration in minutes (must be positive)
    pub lease_minutes: i64,
}

impl ServerConfig {
    /// Load configuration following the env -> file -> default priority order
    pub fn load() -> Result<Self> {
        let file = load_config_file();

        let bind_addr = resolve_string("LABELQ_BIND", &file, "bind_addr")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let data_dir = resolve_string("LABELQ_DATA_DIR", &file, "data_dir")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let lease_minutes = match resolve_string("LABELQ_LEASE_MINUTES", &file, "lease_minutes") {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|e| Error::Config(format!("Invalid lease_minutes '{}': {}", raw, e)))?,
            None => DEFAULT_LEASE_MINUTES,
        };

        if lease_minutes <= 0 {
            return Err(Error::Config(format!(
                "lease_minutes must be positive, got {}",
                lease_minutes
            )));
        }

        Ok(Self {
            bind_addr,
            data_dir,
            lease_minutes,
        })
    }

    /// Path of the SQLite database file inside the data directory
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("labelq.db")
    }

    /// Assignment lease as a chrono duration
    pub fn lease(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.lease_minutes)
    }
}

/// Resolve a single setting: env var first, then config file key
fn resolve_string(env_var: &str, file: &Option<toml::Value>, key: &str) -> Option<String> {
    if let Ok(value) = std::env::var(env_var) {
        if !value.is_empty() {
            return Some(value);
        }
    }

    file.as_ref()
        .and_then(|config| config.get(key))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Load the TOML config file if one exists
///
/// Checked locations: `<user config dir>/labelq/config.toml`, then
/// `/etc/labelq/config.toml` on Linux. A missing or unparseable file is
/// treated as absent (env vars and defaults still apply).
fn load_config_file() -> Option<toml::Value> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("labelq").join("config.toml"));
    }
    if cfg!(target_os = "linux") {
        candidates.push(PathBuf::from("/etc/labelq/config.toml"));
    }

    for path in candidates {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(&path) {
                match toml::from_str::<toml::Value>(&content) {
                    Ok(value) => return Some(value),
                    Err(e) => {
                        tracing::warn!("Ignoring malformed config file {}: {}", path.display(), e);
                    }
                }
            }
        }
    }

    None
}

/// OS-dependent default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("labelq"))
        .unwrap_or_else(|| PathBuf::from("./labelq_data"))
}
