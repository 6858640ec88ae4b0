//! Mutable session state.
//!
//! `SessionState` is owned by the [`Reporter`](super::service::Reporter)
//! and mutated only from command dispatch, which runs synchronously inside
//! the loop.  No locking, no globals.

use std::time::Duration;

use crate::error::ConfigError;
use crate::sensors::Unit;

/// Loop-level view of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopState {
    /// Emitting a sample every interval.
    Running,
    /// Connected and accepting commands, but not emitting.
    Paused,
    /// Absorbing.  The loop exits at the top of the next iteration.
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    interval: Duration,
    unit: Unit,
    paused: bool,
    running: bool,
}

impl SessionState {
    /// Fresh running session.  `interval` must be non-zero.
    pub fn new(interval: Duration, unit: Unit) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::NonPositiveInterval(0));
        }
        Ok(Self {
            interval,
            unit,
            paused: false,
            running: true,
        })
    }

    // ── Mutators ──────────────────────────────────────────────

    /// Set the interval in whole seconds.  Non-positive values are rejected
    /// and leave the state untouched.
    pub fn set_interval(&mut self, secs: i64) -> Result<Duration, ConfigError> {
        if secs <= 0 {
            return Err(ConfigError::NonPositiveInterval(secs));
        }
        self.interval = Duration::from_secs(secs.unsigned_abs());
        Ok(self.interval)
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flip `running` to false.  Returns `true` only on the call that
    /// actually ended the session.
    pub fn mark_terminated(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        was_running
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn loop_state(&self) -> LoopState {
        if !self.running {
            LoopState::Terminated
        } else if self.paused {
            LoopState::Paused
        } else {
            LoopState::Running
        }
    }

    /// Whether this iteration should sample and sleep.
    pub fn is_emitting(&self) -> bool {
        self.loop_state() == LoopState::Running
    }
}
