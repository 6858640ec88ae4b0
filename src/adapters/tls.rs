//! TLS client transport (rustls, ring provider).
//!
//! ## Connection model
//!
//! 1. [`TlsTransport::connect`] resolves and connects a blocking TCP socket.
//! 2. The handshake runs to completion before the transport is returned,
//!    so the event loop only ever sees an established session.
//! 3. `readable` first checks for plaintext rustls already decrypted, then
//!    polls the socket.
//! 4. `read` pulls at most one TLS read per call; a record that carries no
//!    application data reports [`ReadStatus::Idle`].
//! 5. `close` sends `close_notify` and shuts the socket down.
//!
//! Trust anchors are the bundled web roots plus, optionally, the
//! certificates in a PEM file.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore};

use crate::error::TransportError;
use crate::link::transport::{ReadStatus, Transport};

use super::poll::wait_readable;
use super::tcp::connect_stream;

/// Per-connection TLS settings.
#[derive(Debug, Clone, Default)]
pub struct TlsOptions {
    /// Extra PEM trust anchors.
    pub ca_file: Option<PathBuf>,
    /// Name to verify instead of the connect host.
    pub server_name: Option<String>,
}

/// Build a client config trusting the web roots plus `ca_file`.
pub fn client_config(ca_file: Option<&Path>) -> Result<Arc<ClientConfig>, TransportError> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    if let Some(path) = ca_file {
        let added = add_pem_roots(&mut roots, path)?;
        info!("trusting {added} certificate(s) from {}", path.display());
    }

    let config =
        ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()
            .map_err(tls_err)?
            .with_root_certificates(roots)
            .with_no_client_auth();
    Ok(Arc::new(config))
}

fn add_pem_roots(roots: &mut RootCertStore, path: &Path) -> Result<usize, TransportError> {
    let file = File::open(path)
        .map_err(|e| TransportError::Tls(format!("{}: {e}", path.display())))?;
    let mut reader = BufReader::new(file);

    let mut added = 0;
    for cert in rustls_pemfile::certs(&mut reader) {
        let cert = cert.map_err(|e| TransportError::Tls(format!("{}: {e}", path.display())))?;
        roots.add(cert).map_err(tls_err)?;
        added += 1;
    }
    if added == 0 {
        return Err(TransportError::Tls(format!(
            "{}: no certificates found",
            path.display()
        )));
    }
    Ok(added)
}

fn tls_err(e: rustls::Error) -> TransportError {
    TransportError::Tls(e.to_string())
}

/// rustls reports protocol failures through `io::Error` with
/// `InvalidData`; keep their message instead of collapsing to a kind.
fn io_err(e: io::Error) -> TransportError {
    if e.kind() == io::ErrorKind::InvalidData {
        TransportError::Tls(e.to_string())
    } else {
        e.into()
    }
}

pub struct TlsTransport {
    conn: ClientConnection,
    sock: TcpStream,
    peer_closed: bool,
}

impl TlsTransport {
    /// Connect to `host:port` and complete the handshake.
    pub fn connect(host: &str, port: u16, options: &TlsOptions) -> Result<Self, TransportError> {
        let config = client_config(options.ca_file.as_deref())?;
        let name = options.server_name.as_deref().unwrap_or(host);
        let server_name = ServerName::try_from(name)
            .map_err(|e| TransportError::Tls(format!("invalid server name '{name}': {e}")))?
            .to_owned();

        let sock = connect_stream(host, port)?;
        Self::handshake(config, server_name, sock)
    }

    /// Run the client handshake over an already-connected socket.
    pub fn handshake(
        config: Arc<ClientConfig>,
        server_name: ServerName<'static>,
        mut sock: TcpStream,
    ) -> Result<Self, TransportError> {
        let mut conn = ClientConnection::new(config, server_name).map_err(tls_err)?;
        while conn.is_handshaking() {
            conn.complete_io(&mut sock).map_err(io_err)?;
        }
        info!(
            "TLS established ({:?}, {:?})",
            conn.protocol_version(),
            conn.negotiated_cipher_suite().map(|s| s.suite())
        );
        Ok(Self {
            conn,
            sock,
            peer_closed: false,
        })
    }

    fn process_packets(&mut self) -> Result<usize, TransportError> {
        let state = self.conn.process_new_packets().map_err(tls_err)?;
        if state.peer_has_closed() {
            self.peer_closed = true;
        }
        Ok(state.plaintext_bytes_to_read())
    }

    /// `None` when no decrypted bytes are buffered.
    fn read_plaintext(&mut self, buf: &mut [u8]) -> Result<Option<ReadStatus>, TransportError> {
        match self.conn.reader().read(buf) {
            Ok(0) => Ok(Some(ReadStatus::Closed)),
            Ok(n) => Ok(Some(ReadStatus::Data(n))),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(Some(ReadStatus::Closed)),
            Err(e) => Err(io_err(e)),
        }
    }

    fn write_pending(&mut self) -> Result<(), TransportError> {
        while self.conn.wants_write() {
            self.conn.write_tls(&mut self.sock).map_err(io_err)?;
        }
        Ok(())
    }
}

impl Transport for TlsTransport {
    fn readable(&mut self, timeout: Duration) -> Result<bool, TransportError> {
        if self.process_packets()? > 0 || self.peer_closed {
            return Ok(true);
        }
        wait_readable(self.sock.as_raw_fd(), timeout)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<ReadStatus, TransportError> {
        if let Some(status) = self.read_plaintext(buf)? {
            return Ok(status);
        }

        match self.conn.read_tls(&mut self.sock) {
            Ok(0) => {
                self.peer_closed = true;
                return Ok(ReadStatus::Closed);
            }
            Ok(_) => {}
            Err(e) if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) => {
                return Ok(ReadStatus::Idle);
            }
            Err(e) if e.kind() == io::ErrorKind::ConnectionReset => {
                self.peer_closed = true;
                return Ok(ReadStatus::Closed);
            }
            Err(e) => return Err(io_err(e)),
        }

        self.process_packets()?;
        // Key updates and alerts may need an answer.
        self.write_pending()?;
        Ok(self.read_plaintext(buf)?.unwrap_or(ReadStatus::Idle))
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.conn.writer().write_all(data).map_err(io_err)?;
        self.write_pending()
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        self.write_pending()?;
        self.sock.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        self.conn.send_close_notify();
        if let Err(e) = self.write_pending() {
            debug!("close_notify not delivered: {e}");
        }
        if let Err(e) = self.sock.shutdown(Shutdown::Both) {
            debug!("tls socket shutdown: {e}");
        }
    }
}
