//! Inbound commands from the peer.
//!
//! The vocabulary is fixed and case-sensitive.  Parsing is total: every line
//! either becomes a [`Command`] or a [`CommandError`] that the dispatcher
//! drops without telling the peer.

use core::fmt;
use core::str::FromStr;

use crate::sensors::Unit;

/// Commands the peer can send to the reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resume periodic emission.
    Start,
    /// Pause periodic emission.
    Stop,
    /// Write the shutdown record and end the session.
    Off,
    /// Switch the reporting unit.
    Scale(Unit),
    /// Set the sampling interval in seconds.  Range is checked by the
    /// session state, not here.
    Period(i64),
    /// Append the text verbatim to the transcript.
    Log(String),
}

/// Why a line did not become a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Not part of the vocabulary.
    Unrecognized,
    /// `PERIOD=` followed by something that is not an integer.
    InvalidPeriod(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized => write!(f, "unrecognized command"),
            Self::InvalidPeriod(v) => write!(f, "invalid period '{v}'"),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        match line {
            "START" => return Ok(Self::Start),
            "STOP" => return Ok(Self::Stop),
            "OFF" => return Ok(Self::Off),
            "SCALE=F" => return Ok(Self::Scale(Unit::Fahrenheit)),
            "SCALE=C" => return Ok(Self::Scale(Unit::Celsius)),
            _ => {}
        }

        if let Some(value) = line.strip_prefix("PERIOD=") {
            // Optional '-' then digits.  `i64::from_str` would also take '+'.
            if value.starts_with('+') {
                return Err(CommandError::InvalidPeriod(value.to_string()));
            }
            return value
                .parse::<i64>()
                .map(Self::Period)
                .map_err(|_| CommandError::InvalidPeriod(value.to_string()));
        }

        if let Some(text) = line.strip_prefix("LOG ") {
            return Ok(Self::Log(text.to_string()));
        }

        Err(CommandError::Unrecognized)
    }
}

impl Command {
    /// Transcript text for a state-changing command.  `LOG` has none; its
    /// payload is written verbatim instead.
    pub fn record_text(&self) -> Option<String> {
        match self {
            Self::Start => Some("START".into()),
            Self::Stop => Some("STOP".into()),
            Self::Off => Some("OFF".into()),
            Self::Scale(unit) => Some(format!("SCALE={unit}")),
            Self::Period(secs) => Some(format!("PERIOD={secs}")),
            Self::Log(_) => None,
        }
    }
}
