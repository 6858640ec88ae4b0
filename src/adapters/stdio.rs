//! Local terminal transport: commands on stdin, reports on stdout.

use std::io::{self, Write};
use std::time::Duration;

use log::debug;

use crate::error::TransportError;
use crate::link::transport::{ReadStatus, Transport};

use super::poll::wait_readable;

/// Standard-stream transport.
///
/// Reads go straight to fd 0 rather than through `std::io::stdin()`:
/// std's buffered reader would pull bytes that `poll` can no longer see.
pub struct StdioTransport {
    stdout: io::Stdout,
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl StdioTransport {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Transport for StdioTransport {
    fn readable(&mut self, timeout: Duration) -> Result<bool, TransportError> {
        wait_readable(libc::STDIN_FILENO, timeout)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<ReadStatus, TransportError> {
        // SAFETY: `buf` is valid for writes of `buf.len()` bytes for the
        // duration of the call.
        let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
        match n {
            0 => Ok(ReadStatus::Closed),
            n if n > 0 => Ok(ReadStatus::Data(n as usize)),
            _ => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(ReadStatus::Idle),
                    _ => Err(err.into()),
                }
            }
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.stdout.lock().write_all(data)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        self.stdout.lock().flush()?;
        Ok(())
    }

    fn close(&mut self) {
        if let Err(e) = self.stdout.lock().flush() {
            debug!("stdout flush on close failed: {e}");
        }
    }
}
