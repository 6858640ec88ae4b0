//! Session configuration
//!
//! Startup parameters for one reporting session.  Values come from an
//! optional JSON file and are then overridden by command-line flags.
//! Invalid values are rejected, never clamped.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sensors::Unit;

/// Default sampling interval in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 1;

/// Where the session's byte stream goes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransportTarget {
    /// Commands on stdin, reports on stdout.
    #[default]
    Local,
    /// Plain TCP to `host:port`.
    Tcp { host: String, port: u16 },
    /// TCP wrapped in TLS.  `ca_file` adds a PEM trust anchor on top of the
    /// bundled web roots; `server_name` overrides the SNI / verified name.
    Tls {
        host: String,
        port: u16,
        #[serde(default)]
        ca_file: Option<PathBuf>,
        #[serde(default)]
        server_name: Option<String>,
    },
}

impl TransportTarget {
    pub fn is_networked(&self) -> bool {
        !matches!(self, Self::Local)
    }
}

/// Core session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    // --- Reporting ---
    /// Sampling interval in seconds
    pub interval_secs: u64,
    /// Initial reporting unit
    pub unit: Unit,

    // --- Identity ---
    /// Identity token announced once after connecting (`ID=<n>`)
    pub id: Option<u64>,

    // --- Transcript ---
    /// Durable log destination; `None` drops transcript records
    pub log_path: Option<PathBuf>,

    // --- Link ---
    pub transport: TransportTarget,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            unit: Unit::Fahrenheit,
            id: None,
            log_path: None,
            transport: TransportTarget::Local,
        }
    }
}

impl SessionConfig {
    /// Load from a JSON file.  Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Unreadable(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| ConfigError::Unreadable(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    /// Reject anything the session cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::NonPositiveInterval(0));
        }
        match &self.transport {
            TransportTarget::Local => {}
            TransportTarget::Tcp { host, port } | TransportTarget::Tls { host, port, .. } => {
                if host.trim().is_empty() {
                    return Err(ConfigError::ValidationFailed("host must not be empty"));
                }
                if *port == 0 {
                    return Err(ConfigError::ValidationFailed("port must be non-zero"));
                }
                if self.id.is_none() {
                    return Err(ConfigError::ValidationFailed(
                        "networked sessions require an id",
                    ));
                }
            }
        }
        if self.id == Some(0) {
            return Err(ConfigError::ValidationFailed("id must be positive"));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// `LOG <text>` is only honoured on the networked (companion) channel.
    pub fn accepts_log_command(&self) -> bool {
        self.transport.is_networked()
    }
}
