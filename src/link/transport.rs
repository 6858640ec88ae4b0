//! Transport abstraction: any duplex byte-oriented channel.
//!
//! Concrete implementations live in [`crate::adapters`]:
//! - stdin / stdout (local terminal)
//! - plain TCP socket
//! - TCP socket wrapped in TLS (rustls client)
//!
//! The reporter is generic over `Transport`, so adding a new transport
//! requires zero changes to the event loop.  Connection setup and any
//! handshake happen before the adapter is handed to the loop.

use std::time::Duration;

use crate::error::TransportError;

/// Outcome of a single non-blocking read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// `n` bytes were copied into the caller's buffer.
    Data(usize),
    /// Nothing to deliver yet (e.g. a TLS record without application data).
    Idle,
    /// The peer closed the stream.
    Closed,
}

/// Duplex byte channel.
pub trait Transport {
    /// Wait at most `timeout` for inbound data.  A zero timeout is a pure
    /// readiness check.  Hang-up counts as readable so the following `read`
    /// can report [`ReadStatus::Closed`].
    fn readable(&mut self, timeout: Duration) -> Result<bool, TransportError>;

    /// Read up to `buf.len()` bytes.  Only called after `readable` returned
    /// `true`, so implementations may assume it will not block.
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadStatus, TransportError>;

    /// Write all of `data` to the peer.
    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), TransportError>;

    /// Tear the stream down.  Called exactly once when the session ends,
    /// on every exit path.
    fn close(&mut self) {}
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn readable(&mut self, timeout: Duration) -> Result<bool, TransportError> {
        (**self).readable(timeout)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<ReadStatus, TransportError> {
        (**self).read(buf)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        (**self).write_all(data)
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        (**self).flush()
    }

    fn close(&mut self) {
        (**self).close();
    }
}

/// A null transport that discards all writes and never has input.
/// Useful for driving the loop without a peer.
pub struct NullTransport;

impl Transport for NullTransport {
    fn readable(&mut self, _timeout: Duration) -> Result<bool, TransportError> {
        Ok(false)
    }

    fn read(&mut self, _buf: &mut [u8]) -> Result<ReadStatus, TransportError> {
        Ok(ReadStatus::Idle)
    }

    fn write_all(&mut self, _data: &[u8]) -> Result<(), TransportError> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}
