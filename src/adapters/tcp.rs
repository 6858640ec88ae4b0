//! Plain TCP client transport.
//!
//! The socket stays in blocking mode; `readable` polls the fd so a read is
//! only attempted when it will not block.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::os::fd::AsRawFd;
use std::time::Duration;

use log::{debug, info};

use crate::error::TransportError;
use crate::link::transport::{ReadStatus, Transport};

use super::poll::wait_readable;

/// Resolve `host:port` and connect to the first address that accepts.
pub fn connect_stream(host: &str, port: u16) -> Result<TcpStream, TransportError> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|e| TransportError::Resolve(format!("{host}:{port} ({e})")))?
        .collect();
    if addrs.is_empty() {
        return Err(TransportError::Resolve(format!("{host}:{port}")));
    }

    let stream = TcpStream::connect(&addrs[..])?;
    stream.set_nodelay(true)?;
    info!("connected to {}", stream.peer_addr()?);
    Ok(stream)
}

pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    pub fn connect(host: &str, port: u16) -> Result<Self, TransportError> {
        connect_stream(host, port).map(Self::from_stream)
    }

    /// Wrap an already-connected stream.
    pub fn from_stream(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl Transport for TcpTransport {
    fn readable(&mut self, timeout: Duration) -> Result<bool, TransportError> {
        wait_readable(self.stream.as_raw_fd(), timeout)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<ReadStatus, TransportError> {
        match self.stream.read(buf) {
            Ok(0) => Ok(ReadStatus::Closed),
            Ok(n) => Ok(ReadStatus::Data(n)),
            Err(e) if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) => {
                Ok(ReadStatus::Idle)
            }
            Err(e) if e.kind() == io::ErrorKind::ConnectionReset => Ok(ReadStatus::Closed),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.stream.write_all(data)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        self.stream.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            debug!("tcp shutdown: {e}");
        }
    }
}
