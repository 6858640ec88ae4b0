//! Scripted adapters for integration tests.
//!
//! Every mock hands out a cloneable handle (`Rc` inside) so a test can keep
//! inspecting the wire, the transcript and the clock after the reporter has
//! taken ownership of the adapter.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use chrono::NaiveTime;
use tempreport::app::ports::{Clock, SensorPort, TranscriptLog};
use tempreport::app::service::Reporter;
use tempreport::config::{SessionConfig, TransportTarget};
use tempreport::error::{SensorError, TransportError};
use tempreport::link::transport::{ReadStatus, Transport};
use tempreport::sensors::{RawSample, Unit, convert};
use tempreport::shutdown::ShutdownTrigger;

// ── Transport ─────────────────────────────────────────────────

/// What the peer side of a [`ScriptedTransport`] observed.
#[derive(Clone, Default)]
pub struct Wire {
    sent: Rc<RefCell<Vec<u8>>>,
    waits: Rc<RefCell<Vec<Duration>>>,
    closed: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl Wire {
    /// Outbound bytes split into lines.
    pub fn sent_lines(&self) -> Vec<String> {
        String::from_utf8(self.sent.borrow().clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Timeouts passed to `readable`, in call order.
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.borrow().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

/// Inbound script: each step is consumed by one `readable` call.
pub struct ScriptedTransport {
    script: VecDeque<Option<Vec<u8>>>,
    hang_up_at_end: bool,
    refuse_writes: bool,
    wire: Wire,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            hang_up_at_end: false,
            refuse_writes: false,
            wire: Wire::default(),
        }
    }

    /// Deliver `bytes` on the next readable poll.
    pub fn chunk(mut self, bytes: &[u8]) -> Self {
        self.script.push_back(Some(bytes.to_vec()));
        self
    }

    /// Report "nothing readable" for the next `n` polls.
    pub fn quiet(mut self, n: usize) -> Self {
        for _ in 0..n {
            self.script.push_back(None);
        }
        self
    }

    /// After the script runs out, report end-of-stream.
    pub fn hang_up(mut self) -> Self {
        self.hang_up_at_end = true;
        self
    }

    /// Fail every write as if the peer had reset the connection.
    pub fn refuse_writes(mut self) -> Self {
        self.refuse_writes = true;
        self
    }

    pub fn wire(&self) -> Wire {
        self.wire.clone()
    }
}

impl Transport for ScriptedTransport {
    fn readable(&mut self, timeout: Duration) -> Result<bool, TransportError> {
        self.wire.waits.borrow_mut().push(timeout);
        match self.script.front() {
            Some(Some(_)) => Ok(true),
            Some(None) => {
                self.script.pop_front();
                Ok(false)
            }
            None => Ok(self.hang_up_at_end),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<ReadStatus, TransportError> {
        match self.script.pop_front() {
            Some(Some(mut bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    self.script.push_front(Some(bytes.split_off(n)));
                }
                Ok(ReadStatus::Data(n))
            }
            Some(None) => Ok(ReadStatus::Idle),
            None => Ok(ReadStatus::Closed),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        if self.refuse_writes {
            return Err(TransportError::Io(io::ErrorKind::ConnectionReset));
        }
        if self.wire.closed.get() {
            return Err(TransportError::Io(io::ErrorKind::BrokenPipe));
        }
        self.wire.sent.borrow_mut().extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn close(&mut self) {
        self.wire.closed.set(true);
    }
}

// ── Clock ─────────────────────────────────────────────────────

/// Virtual wall clock: `sleep` advances time instead of blocking.
#[derive(Clone)]
pub struct ManualClock {
    now: Rc<Cell<NaiveTime>>,
    sleeps: Rc<RefCell<Vec<Duration>>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn at(h: u32, m: u32, s: u32) -> Self {
        Self {
            now: Rc::new(Cell::new(NaiveTime::from_hms_opt(h, m, s).unwrap())),
            sleeps: Rc::default(),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    pub fn time(&self) -> NaiveTime {
        self.now.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveTime {
        self.now.get()
    }

    fn sleep(&mut self, duration: Duration, _cancel: &ShutdownTrigger) {
        self.sleeps.borrow_mut().push(duration);
        let step = chrono::Duration::from_std(duration).unwrap();
        self.now.set(self.now.get() + step);
    }
}

// ── Transcript ────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MemoryLog {
    lines: Rc<RefCell<Vec<String>>>,
}

#[allow(dead_code)]
impl MemoryLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Records whose text (after the `HH:MM:SS ` stamp) equals `text`.
    pub fn count(&self, text: &str) -> usize {
        self.lines
            .borrow()
            .iter()
            .filter(|l| l.get(9..) == Some(text))
            .count()
    }
}

impl TranscriptLog for MemoryLog {
    fn append(&mut self, line: &str) -> io::Result<()> {
        self.lines.borrow_mut().push(line.to_string());
        Ok(())
    }
}

/// A log whose storage is gone.
pub struct FullLog;

impl TranscriptLog for FullLog {
    fn append(&mut self, _line: &str) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::StorageFull))
    }
}

// ── Sensor ────────────────────────────────────────────────────

/// Plays back queued readings, then repeats `steady`.
#[derive(Clone)]
pub struct ScriptedSensor {
    queued: Rc<RefCell<VecDeque<Result<RawSample, SensorError>>>>,
    steady: u16,
    closed: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl ScriptedSensor {
    pub fn steady(raw: u16) -> Self {
        Self {
            queued: Rc::default(),
            steady: raw,
            closed: Rc::default(),
        }
    }

    pub fn then(self, reading: Result<RawSample, SensorError>) -> Self {
        self.queued.borrow_mut().push_back(reading);
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl SensorPort for ScriptedSensor {
    fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        self.queued
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(RawSample(self.steady)))
    }

    fn close(&mut self) {
        self.closed.set(true);
    }
}

// ── Rig ───────────────────────────────────────────────────────

pub const STEADY_RAW: u16 = 512;

pub type TestReporter = Reporter<ScriptedSensor, ScriptedTransport, ManualClock, MemoryLog>;

/// Handles a test keeps after the reporter owns the adapters.
pub struct Rig {
    pub wire: Wire,
    pub log: MemoryLog,
    pub clock: ManualClock,
    pub sensor: ScriptedSensor,
}

#[allow(dead_code)]
pub fn rig_with(
    config: &SessionConfig,
    sensor: ScriptedSensor,
    transport: ScriptedTransport,
) -> (TestReporter, Rig) {
    let rig = Rig {
        wire: transport.wire(),
        log: MemoryLog::default(),
        clock: ManualClock::at(12, 0, 0),
        sensor: sensor.clone(),
    };
    let reporter = Reporter::new(
        config,
        sensor,
        transport,
        rig.clock.clone(),
        rig.log.clone(),
    )
    .unwrap();
    (reporter, rig)
}

/// Local session at the defaults (1 s, Fahrenheit) with a steady sensor.
#[allow(dead_code)]
pub fn rig(transport: ScriptedTransport) -> (TestReporter, Rig) {
    rig_with(
        &SessionConfig::default(),
        ScriptedSensor::steady(STEADY_RAW),
        transport,
    )
}

/// Networked session: `LOG` is honoured and an id is configured.
#[allow(dead_code)]
pub fn networked_config() -> SessionConfig {
    SessionConfig {
        id: Some(42),
        transport: TransportTarget::Tcp {
            host: "lab".into(),
            port: 9000,
        },
        ..SessionConfig::default()
    }
}

/// The text the reporter emits for the steady sensor in `unit`.
#[allow(dead_code)]
pub fn steady_reading(unit: Unit) -> String {
    convert(RawSample(STEADY_RAW), unit).unwrap().to_string()
}
