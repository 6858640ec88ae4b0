//! Port traits: the boundary between the reporting core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Reporter (event loop)
//! ```
//!
//! Driven adapters (ADC, wall clock, log file) implement these traits.  The
//! [`Reporter`](super::service::Reporter) consumes them via generics, so the
//! loop never touches hardware or the filesystem directly.  The byte-stream
//! port lives next to the framer in [`crate::link::transport`].

use std::io;
use std::time::Duration;

use chrono::NaiveTime;

use crate::error::SensorError;
use crate::sensors::RawSample;
use crate::shutdown::ShutdownTrigger;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the loop calls this once per emission.
pub trait SensorPort {
    /// Take one raw sample.  An error skips the current emission only.
    fn read_raw(&mut self) -> Result<RawSample, SensorError>;

    /// Release the underlying device.  Called once when the session ends.
    fn close(&mut self) {}
}

impl<S: SensorPort + ?Sized> SensorPort for Box<S> {
    fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        (**self).read_raw()
    }

    fn close(&mut self) {
        (**self).close();
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: wall clock + interval sleep)
// ───────────────────────────────────────────────────────────────

/// Time source for transcript timestamps and the interval sleep.
///
/// `sleep` is one of the two places the loop suspends; test clocks advance
/// virtual time instead of blocking.
pub trait Clock {
    /// Current local wall-clock time of day.
    fn now(&self) -> NaiveTime;

    /// Suspend for `duration`, or less if `cancel` fires meanwhile.
    ///
    /// Implementations that block MUST observe `cancel` while waiting, so a
    /// shutdown request never waits out a long interval.
    fn sleep(&mut self, duration: Duration, cancel: &ShutdownTrigger);
}

// ───────────────────────────────────────────────────────────────
// Transcript log port (driven adapter: domain → durable log)
// ───────────────────────────────────────────────────────────────

/// Append-only line sink.
///
/// Implementations MUST flush before returning so the log reflects runtime
/// history even if the process is killed right after the call.
pub trait TranscriptLog {
    /// Append `line` (no terminator) and flush.
    fn append(&mut self, line: &str) -> io::Result<()>;
}

/// A log that drops every record.  Used when no log destination is
/// configured.
pub struct NullLog;

impl TranscriptLog for NullLog {
    fn append(&mut self, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

impl<L: TranscriptLog + ?Sized> TranscriptLog for Box<L> {
    fn append(&mut self, line: &str) -> io::Result<()> {
        (**self).append(line)
    }
}
