//! Unified error types for the reporter.
//!
//! A single `Error` enum that every subsystem converts into, so the event
//! loop and the binary handle failures uniformly.  The variants map onto the
//! four failure classes the session distinguishes: configuration, transport,
//! sensor and protocol, plus the durable transcript.

use core::fmt;
use std::io;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Startup configuration is invalid, or a runtime update was rejected.
    Config(ConfigError),
    /// The connected byte stream failed.  Fatal to the session.
    Transport(TransportError),
    /// The sensor could not produce a sample.
    Sensor(SensorError),
    /// The peer violated the line protocol beyond recovery.
    Protocol(ProtocolError),
    /// The durable transcript could not be written.
    Transcript(io::ErrorKind),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Protocol(e) => write!(f, "protocol: {e}"),
            Self::Transcript(kind) => write!(f, "transcript: {kind}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Sampling interval must be strictly positive.
    NonPositiveInterval(i64),
    /// Unit selector was not `C` or `F`.
    InvalidUnit(String),
    /// A field failed validation.  The message names the field.
    ValidationFailed(&'static str),
    /// A configuration file could not be read or parsed.
    Unreadable(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveInterval(v) => write!(f, "interval must be positive, got {v}"),
            Self::InvalidUnit(u) => write!(f, "unknown unit '{u}' (expected C or F)"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Unreadable(msg) => write!(f, "unreadable config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Socket, pipe or terminal I/O failure.
    Io(io::ErrorKind),
    /// TLS configuration, handshake or record-layer failure.
    Tls(String),
    /// Name resolution produced no usable address.
    Resolve(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "I/O error: {kind}"),
            Self::Tls(msg) => write!(f, "TLS error: {msg}"),
            Self::Resolve(host) => write!(f, "could not resolve '{host}'"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<io::Error> for TransportError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.kind())
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error.
    AdcReadFailed,
    /// The ADC produced something that is not a raw count.
    Malformed,
    /// Reading is outside the converter's defined domain.
    OutOfRange(u16),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::Malformed => write!(f, "malformed ADC reading"),
            Self::OutOfRange(raw) => write!(f, "raw sample {raw} out of range"),
        }
    }
}

impl std::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Protocol errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// More than `limit` bytes arrived without a line terminator.
    LineTooLong { limit: usize },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineTooLong { limit } => {
                write!(f, "unterminated command line exceeds {limit} bytes")
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
