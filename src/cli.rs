//! Command-line surface of the `tempreport` binary.
//!
//! Flags override values loaded from `--config`; the merged result is
//! validated before anything is opened.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{SessionConfig, TransportTarget};
use crate::error::ConfigError;
use crate::sensors::Unit;

#[derive(Debug, Parser)]
#[command(name = "tempreport", version, about = "Periodic thermistor reporter")]
pub struct Cli {
    /// Sampling interval in seconds
    #[arg(long, value_name = "SECS")]
    pub period: Option<u64>,

    /// Initial reporting unit
    #[arg(long, value_name = "C|F", value_parser = parse_unit)]
    pub scale: Option<Unit>,

    /// Transcript file (created or truncated at startup)
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Identity token announced after connecting
    #[arg(long, value_name = "N")]
    pub id: Option<u64>,

    /// JSON session configuration
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// IIO raw channel, e.g. /sys/bus/iio/devices/iio:device0/in_voltage0_raw
    #[arg(long, value_name = "PATH", conflicts_with = "sim_raw")]
    pub adc: Option<PathBuf>,

    /// Report a fixed raw count instead of reading an ADC
    #[arg(long, value_name = "COUNT")]
    pub sim_raw: Option<u16>,

    #[command(subcommand)]
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Link {
    /// Commands on stdin, reports on stdout
    Local,
    /// Plain TCP client
    Tcp {
        #[arg(long)]
        host: String,
        port: u16,
    },
    /// TLS client
    Tls {
        #[arg(long)]
        host: String,
        port: u16,
        /// Extra PEM trust anchors
        #[arg(long, value_name = "PEM")]
        ca_file: Option<PathBuf>,
        /// Certificate name to verify instead of the host
        #[arg(long, value_name = "NAME")]
        server_name: Option<String>,
    },
}

/// Where raw samples come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorSource {
    Sysfs(PathBuf),
    Simulated(u16),
}

fn parse_unit(s: &str) -> Result<Unit, ConfigError> {
    s.parse()
}

impl From<Link> for TransportTarget {
    fn from(link: Link) -> Self {
        match link {
            Link::Local => Self::Local,
            Link::Tcp { host, port } => Self::Tcp { host, port },
            Link::Tls {
                host,
                port,
                ca_file,
                server_name,
            } => Self::Tls {
                host,
                port,
                ca_file,
                server_name,
            },
        }
    }
}

impl Cli {
    pub fn sensor_source(&self) -> SensorSource {
        match &self.adc {
            Some(path) => SensorSource::Sysfs(path.clone()),
            None => SensorSource::Simulated(
                self.sim_raw
                    .unwrap_or(crate::adapters::sensor::SIMULATED_DEFAULT_RAW),
            ),
        }
    }

    /// Merge `--config` (if any) with the flags and validate the result.
    pub fn into_config(self) -> Result<SessionConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };

        if let Some(secs) = self.period {
            config.interval_secs = secs;
        }
        if let Some(unit) = self.scale {
            config.unit = unit;
        }
        if let Some(path) = self.log {
            config.log_path = Some(path);
        }
        if let Some(id) = self.id {
            config.id = Some(id);
        }
        if let Some(link) = self.link {
            config.transport = link.into();
        }

        config.validate()?;
        Ok(config)
    }
}
