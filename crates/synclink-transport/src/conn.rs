use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{ConnectError, Result, TransportError};
use crate::portfile::PortFile;

/// Process-wide connection state, shared with everything that needs the
/// connectivity flag. Replaced wholesale on reconnect.
#[derive(Debug)]
pub struct ConnectionState {
    port: u16,
    connected: AtomicBool,
}

impl ConnectionState {
    fn new(port: u16) -> Self {
        Self {
            port,
            connected: AtomicBool::new(true),
        }
    }

    /// The daemon port this connection was opened against.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Whether the connection is currently believed live.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Flip the flag to disconnected. Idempotent.
    pub fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::Release);
    }
}

/// Opens the daemon connection.
pub struct Connector;

impl Connector {
    /// Resolve the port from the default port-file location and connect.
    pub fn connect() -> std::result::Result<ConnectionHandle, ConnectError> {
        Self::connect_with(&PortFile::default_location()?)
    }

    /// Resolve the port from an explicit port file and connect.
    ///
    /// No retry is performed here; retry and backoff policy belong to
    /// the caller.
    pub fn connect_with(
        port_file: &PortFile,
    ) -> std::result::Result<ConnectionHandle, ConnectError> {
        let port = port_file.read_port()?;
        info!(port, "connecting to daemon");

        let stream = TcpStream::connect(("127.0.0.1", port))
            .map_err(|source| ConnectError::Refused { port, source })?;

        if let Err(err) = stream.set_nodelay(true) {
            warn!(%err, "failed to set TCP_NODELAY");
        }

        info!(port, "connected to daemon");
        Ok(ConnectionHandle {
            stream,
            state: Arc::new(ConnectionState::new(port)),
        })
    }
}

/// An open connection to the daemon.
///
/// Exactly one exists per logical connection. The read and write paths
/// run on cloned descriptors so a blocked write never stalls the reader.
pub struct ConnectionHandle {
    stream: TcpStream,
    state: Arc<ConnectionState>,
}

impl ConnectionHandle {
    /// Shared connection state.
    pub fn state(&self) -> Arc<ConnectionState> {
        Arc::clone(&self.state)
    }

    /// Clone a read half with the given read timeout applied.
    ///
    /// The timeout bounds each blocking `read`, letting the owning loop
    /// poll the connected flag without busy-spinning.
    pub fn read_half(&self, read_timeout: Option<Duration>) -> Result<TcpStream> {
        let half = self.stream.try_clone().map_err(TransportError::Io)?;
        half.set_read_timeout(read_timeout)
            .map_err(TransportError::Io)?;
        Ok(half)
    }

    /// Clone a write half.
    pub fn write_half(&self) -> Result<TcpStream> {
        self.stream.try_clone().map_err(TransportError::Io)
    }

    /// Close the socket and mark the connection dead.
    ///
    /// The read half observes the shutdown as EOF, which unwinds the
    /// owning read loop.
    pub fn disconnect(&self) {
        self.state.mark_disconnected();
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => debug!("connection shut down"),
            Err(err) if err.kind() == std::io::ErrorKind::NotConnected => {}
            Err(err) => warn!(%err, "error shutting down connection"),
        }
    }
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("port", &self.state.port())
            .field("connected", &self.state.is_connected())
            .finish()
    }
}
