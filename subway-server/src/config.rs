//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable holding the listen address.
pub const ADDR_VAR: &str = "SUBWAY_ADDR";

/// Environment variable holding the snapshot file path.
pub const SNAPSHOT_VAR: &str = "SUBWAY_SNAPSHOT";

/// Error returned when a configuration value cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}: {reason}")]
pub struct ConfigError {
    var: &'static str,
    reason: String,
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the server listens on.
    pub bind_addr: SocketAddr,

    /// Where the network is persisted between runs.
    /// Without one the network lives in memory only.
    pub snapshot_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from a variable lookup, falling back to defaults
    /// for anything unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = lookup(ADDR_VAR) {
            config.bind_addr = addr.trim().parse().map_err(|e| ConfigError {
                var: ADDR_VAR,
                reason: format!("{addr:?}: {e}"),
            })?;
        }

        if let Some(path) = lookup(SNAPSHOT_VAR) {
            if path.trim().is_empty() {
                return Err(ConfigError {
                    var: SNAPSHOT_VAR,
                    reason: "path must not be blank".to_string(),
                });
            }
            config.snapshot_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            snapshot_path: None,
        }
    }
}
