//! Reporter: the single-threaded event loop.
//!
//! [`Reporter`] owns the session state, the inbound line framer and the
//! transcript.  All I/O flows through port traits, so the whole loop runs
//! against mock adapters in tests.
//!
//! ```text
//!   SensorPort ──▶ ┌─────────────────────────┐ ──▶ TranscriptLog
//!                  │        Reporter          │
//!   Transport  ◀──▶│  state · framer · dispatch│ ◀── ShutdownTrigger
//!                  └─────────────────────────┘
//!                             │ Clock (stamps, interval sleep)
//! ```
//!
//! One iteration:
//!
//! 1. honour a pending shutdown request;
//! 2. if running and not paused, sample, convert and emit;
//! 3. wait for inbound data (zero timeout while emitting, a short advisory
//!    wait while paused);
//! 4. if readable, read one chunk, frame it, dispatch every complete line;
//! 5. if still running and not paused, sleep for the current interval.
//!
//! The readability wait and the interval sleep are the only suspension
//! points.  The sleep is cut short when the shutdown trigger fires.

use std::time::Duration;

use log::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::Result;
use crate::link::framer::{CommandLine, LineFramer};
use crate::link::transport::{ReadStatus, Transport};
use crate::sensors::convert;
use crate::shutdown::ShutdownTrigger;

use super::commands::{Command, CommandError};
use super::ports::{Clock, SensorPort, TranscriptLog};
use super::state::{LoopState, SessionState};
use super::transcript::Transcript;

/// Bytes pulled from the transport per readable iteration.
pub const READ_CHUNK: usize = 256;

/// Readability wait used while paused, so a paused session does not spin.
pub const PAUSED_POLL_WAIT: Duration = Duration::from_millis(50);

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The peer sent `OFF`.
    Off,
    /// The host fired the shutdown trigger.
    Interrupted,
    /// The inbound stream reached end-of-file.
    StreamClosed,
}

/// Counters reported when the session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSummary {
    pub end: Option<EndReason>,
    /// Samples reported to the peer.
    pub emissions: u64,
    /// Cycles whose sample could not be read or converted.
    pub skipped: u64,
    /// Commands applied.
    pub commands: u64,
    /// Lines dropped: unrecognised, malformed, rejected or after `OFF`.
    pub ignored: u64,
    /// Transcript records written.
    pub records: u64,
}

// ───────────────────────────────────────────────────────────────
// Reporter
// ───────────────────────────────────────────────────────────────

pub struct Reporter<S, T, C, L> {
    state: SessionState,
    framer: LineFramer,
    sensor: S,
    transport: T,
    clock: C,
    transcript: Transcript<L>,
    shutdown: ShutdownTrigger,
    /// `LOG <text>` is honoured only on the networked channel.
    accept_log: bool,
    /// Identity sent as `ID=<n>` before the first iteration.
    announce_id: Option<u64>,
    summary: SessionSummary,
}

impl<S, T, C, L> Reporter<S, T, C, L>
where
    S: SensorPort,
    T: Transport,
    C: Clock,
    L: TranscriptLog,
{
    /// Build a reporter for `config` over already-connected adapters.
    pub fn new(
        config: &SessionConfig,
        sensor: S,
        transport: T,
        clock: C,
        log: L,
    ) -> Result<Self> {
        let state = SessionState::new(config.interval(), config.unit)?;
        let announce_id = match config.id {
            Some(id) if config.transport.is_networked() => Some(id),
            Some(_) => {
                debug!("id ignored on the local channel");
                None
            }
            None => None,
        };
        Ok(Self {
            state,
            framer: LineFramer::new(),
            sensor,
            transport,
            clock,
            transcript: Transcript::new(log),
            shutdown: ShutdownTrigger::new(),
            accept_log: config.accepts_log_command(),
            announce_id,
            summary: SessionSummary::default(),
        })
    }

    /// Use a trigger shared with the host instead of a private one.
    pub fn with_shutdown_trigger(mut self, trigger: ShutdownTrigger) -> Self {
        self.shutdown = trigger;
        self
    }

    /// Handle the host can fire from another thread or a signal handler.
    pub fn shutdown_trigger(&self) -> ShutdownTrigger {
        self.shutdown.clone()
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce the identity (networked channels only), then run until
    /// `OFF`, the shutdown trigger, stream closure or a fatal error.  The
    /// transport and the sensor are released on every path, including a
    /// failed announcement.
    pub fn run(mut self) -> Result<SessionSummary> {
        info!(
            "session started: interval={}s unit={}",
            self.state.interval().as_secs(),
            self.state.unit()
        );
        let outcome = self.announce().and_then(|()| self.run_loop());
        self.release();
        match &outcome {
            Ok(()) => info!("session ended: {:?}", self.summary.end),
            Err(e) => warn!("session failed: {e}"),
        }
        outcome.map(|()| self.summary())
    }

    fn run_loop(&mut self) -> Result<()> {
        while self.state.is_running() {
            self.iterate()?;
        }
        Ok(())
    }

    /// Send the identity token once.  Later calls do nothing.
    pub fn announce(&mut self) -> Result<()> {
        let Some(id) = self.announce_id.take() else {
            return Ok(());
        };
        info!("announcing ID={id}");
        self.transcript
            .emit_verbatim(&format!("ID={id}"), &mut self.transport)
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run exactly one loop iteration.  No-op once terminated.
    pub fn iterate(&mut self) -> Result<()> {
        if !self.state.is_running() {
            return Ok(());
        }

        if self.shutdown.is_requested() {
            info!("shutdown trigger fired");
            return self.shut_down(EndReason::Interrupted);
        }

        if self.state.is_emitting() {
            self.emit_sample()?;
        }

        let wait = if self.state.is_paused() {
            PAUSED_POLL_WAIT
        } else {
            Duration::ZERO
        };
        if self.transport.readable(wait)? {
            self.pump_inbound()?;
        }

        // Re-read after dispatch: a PERIOD= or STOP takes effect right away.
        if self.state.is_emitting() {
            self.clock.sleep(self.state.interval(), &self.shutdown);
        }
        Ok(())
    }

    fn emit_sample(&mut self) -> Result<()> {
        let raw = match self.sensor.read_raw() {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping sample: {e}");
                self.summary.skipped += 1;
                return Ok(());
            }
        };
        let Some(temperature) = convert(raw, self.state.unit()) else {
            warn!("skipping sample: raw {} outside thermistor domain", raw.0);
            self.summary.skipped += 1;
            return Ok(());
        };

        let now = self.clock.now();
        self.transcript
            .emit(now, &temperature.to_string(), &mut self.transport)?;
        self.summary.emissions += 1;
        Ok(())
    }

    fn pump_inbound(&mut self) -> Result<()> {
        let mut buf = [0u8; READ_CHUNK];
        match self.transport.read(&mut buf)? {
            ReadStatus::Data(n) => self.feed(&buf[..n]),
            ReadStatus::Idle => Ok(()),
            ReadStatus::Closed => {
                info!("inbound stream closed by peer");
                if self.state.mark_terminated() {
                    self.summary.end = Some(EndReason::StreamClosed);
                }
                Ok(())
            }
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Frame `data` and dispatch every complete line in arrival order.
    ///
    /// An overlong unterminated line is fatal, but only after the lines
    /// completed before it have been applied.
    pub fn feed(&mut self, data: &[u8]) -> Result<()> {
        let mut lines = Vec::new();
        let framed = self.framer.feed(data, |line| lines.push(line));

        for line in &lines {
            self.dispatch_line(line)?;
        }

        match framed {
            Err(e) if self.state.is_running() => {
                warn!("closing session: {e}");
                Err(e.into())
            }
            _ => Ok(()),
        }
    }

    fn dispatch_line(&mut self, line: &CommandLine) -> Result<()> {
        match line.parse::<Command>() {
            Ok(cmd) => self.dispatch(cmd),
            Err(CommandError::Unrecognized) => {
                debug!("ignoring line {:?}", line.as_str());
                self.summary.ignored += 1;
                Ok(())
            }
            Err(e) => {
                warn!("rejecting {:?}: {e}", line.as_str());
                self.summary.ignored += 1;
                Ok(())
            }
        }
    }

    /// Apply one command to the session.  Runs to completion before the
    /// next line is looked at.
    pub fn dispatch(&mut self, cmd: Command) -> Result<()> {
        if !self.state.is_running() {
            debug!("session terminated, ignoring {cmd:?}");
            self.summary.ignored += 1;
            return Ok(());
        }

        match &cmd {
            Command::Start => self.state.resume(),
            Command::Stop => self.state.pause(),
            Command::Off => {}
            Command::Scale(unit) => self.state.set_unit(*unit),
            Command::Period(secs) => {
                if let Err(e) = self.state.set_interval(*secs) {
                    warn!("rejecting PERIOD={secs}: {e}");
                    self.summary.ignored += 1;
                    return Ok(());
                }
            }
            Command::Log(text) => {
                if !self.accept_log {
                    debug!("LOG not accepted on this channel");
                    self.summary.ignored += 1;
                    return Ok(());
                }
                self.summary.commands += 1;
                return self.transcript.record_verbatim(text);
            }
        }

        self.summary.commands += 1;
        if let Some(text) = cmd.record_text() {
            let now = self.clock.now();
            self.transcript.record(now, &text)?;
        }
        if cmd == Command::Off {
            self.shut_down(EndReason::Off)?;
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn loop_state(&self) -> LoopState {
        self.state.loop_state()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            records: self.transcript.records(),
            ..self.summary
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// Terminate once: the first caller writes the SHUTDOWN record and
    /// mirrors it to the peer, later callers do nothing.
    fn shut_down(&mut self, reason: EndReason) -> Result<()> {
        if !self.state.mark_terminated() {
            return Ok(());
        }
        self.summary.end = Some(reason);
        info!("shutting down ({reason:?})");
        let now = self.clock.now();
        self.transcript
            .emit(now, "SHUTDOWN", &mut self.transport)
    }

    fn release(&mut self) {
        self.transport.close();
        self.sensor.close();
        debug!("transport and sensor released");
    }
}
