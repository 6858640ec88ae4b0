//! Transcript sink.
//!
//! Every state change and every emission becomes one line in the durable
//! log, stamped `HH:MM:SS`.  Emissions and the shutdown record are also
//! mirrored to the peer.  Each append is flushed before the call returns.

use chrono::NaiveTime;
use log::debug;

use crate::error::{Error, Result};
use crate::link::transport::Transport;

use super::ports::TranscriptLog;

/// Render a wall-clock time the way the transcript stamps records.
pub fn format_timestamp(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

pub struct Transcript<L> {
    log: L,
    records: u64,
}

impl<L: TranscriptLog> Transcript<L> {
    pub fn new(log: L) -> Self {
        Self { log, records: 0 }
    }

    /// Append `"<stamp> <text>"` to the log.
    pub fn record(&mut self, stamp: NaiveTime, text: &str) -> Result<()> {
        let line = format!("{} {}", format_timestamp(stamp), text);
        self.append(&line)
    }

    /// Append `text` exactly as given, without a timestamp.
    pub fn record_verbatim(&mut self, text: &str) -> Result<()> {
        self.append(text)
    }

    /// Record a stamped line and send the same line to the peer.
    pub fn emit(
        &mut self,
        stamp: NaiveTime,
        text: &str,
        transport: &mut impl Transport,
    ) -> Result<()> {
        let line = format!("{} {}", format_timestamp(stamp), text);
        self.append(&line)?;
        mirror(transport, &line)
    }

    /// Record an unstamped line and send it to the peer (`ID=<n>`).
    pub fn emit_verbatim(&mut self, text: &str, transport: &mut impl Transport) -> Result<()> {
        self.append(text)?;
        mirror(transport, text)
    }

    /// Records appended since the session began.
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn into_inner(self) -> L {
        self.log
    }

    fn append(&mut self, line: &str) -> Result<()> {
        self.log
            .append(line)
            .map_err(|e| Error::Transcript(e.kind()))?;
        self.records += 1;
        debug!("transcript: {line}");
        Ok(())
    }
}

fn mirror(transport: &mut impl Transport, line: &str) -> Result<()> {
    let mut framed = String::with_capacity(line.len() + 1);
    framed.push_str(line);
    framed.push('\n');
    transport.write_all(framed.as_bytes())?;
    transport.flush()?;
    Ok(())
}
