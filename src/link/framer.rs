//! Line framer for the command channel.
//!
//! Wire format: UTF-8 text lines terminated by `\n` (a `\r` directly before
//! the terminator is dropped).
//!
//! The framer accumulates incoming bytes into a bounded buffer and yields
//! complete lines.  This handles partial reads gracefully: a single
//! `Transport::read` may return part of a line, exactly one line, or several
//! lines concatenated; the unterminated tail stays buffered for the next
//! call.

use core::fmt;
use core::ops::Deref;

use log::warn;

use crate::error::ProtocolError;

/// Maximum command line length in bytes, terminator excluded (protects
/// against memory exhaustion by a peer that never sends `\n`).
pub const MAX_LINE_LEN: usize = 256;

/// Room for a full line plus the `\r` of a CRLF terminator.
const PENDING_CAP: usize = MAX_LINE_LEN + 1;

/// One complete command line, terminator stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(heapless::String<MAX_LINE_LEN>);

impl CommandLine {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for CommandLine {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Streaming line decoder with a fixed-capacity buffer.
pub struct LineFramer {
    pending: heapless::Vec<u8, PENDING_CAP>,
    /// Terminated lines dropped because they were not valid UTF-8.
    dropped: u64,
}

impl LineFramer {
    pub fn new() -> Self {
        Self {
            pending: heapless::Vec::new(),
            dropped: 0,
        }
    }

    /// Feed bytes into the framer, calling `on_line` for every complete line
    /// in arrival order.
    ///
    /// Returns [`ProtocolError::LineTooLong`] as soon as the unterminated
    /// tail would exceed [`MAX_LINE_LEN`].  Lines completed earlier in the
    /// same `data` have already been delivered by then; the rest of `data`
    /// and the partial line are discarded.
    pub fn feed(
        &mut self,
        data: &[u8],
        mut on_line: impl FnMut(CommandLine),
    ) -> Result<(), ProtocolError> {
        for &byte in data {
            if byte == b'\n' {
                if let Some(line) = self.take_line() {
                    on_line(line);
                }
                continue;
            }
            if !self.has_room_for(byte) || self.pending.push(byte).is_err() {
                self.pending.clear();
                return Err(ProtocolError::LineTooLong {
                    limit: MAX_LINE_LEN,
                });
            }
        }
        Ok(())
    }

    /// Bytes of the current unterminated line.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Lines dropped for invalid UTF-8 since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Forget any partial line (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Content bytes are capped at `MAX_LINE_LEN`; only a `\r` may sit in
    /// the extra slot, and only until the `\n` that completes the line.
    fn has_room_for(&self, byte: u8) -> bool {
        self.pending.len() < MAX_LINE_LEN
            || (self.pending.len() == MAX_LINE_LEN && byte == b'\r')
    }

    fn take_line(&mut self) -> Option<CommandLine> {
        let raw = self.pending.as_slice();
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);

        let line = match core::str::from_utf8(raw) {
            Ok(text) => {
                let mut s = heapless::String::new();
                // Cannot overflow: at most `MAX_LINE_LEN` bytes remain after the `\r` strip.
                let _ = s.push_str(text);
                Some(CommandLine(s))
            }
            Err(_) => {
                warn!("framer: dropping non-UTF-8 line ({} bytes)", raw.len());
                self.dropped += 1;
                None
            }
        };
        self.pending.clear();
        line
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}
