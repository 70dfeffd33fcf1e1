use std::net::TcpStream;
use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use serde_json::Value;
use synclink_frame::{FrameError, FrameSink, FrameSource, ReadEvent, WireConfig};
use synclink_proto::{Envelope, RequestKind, SignalKind};
use synclink_transport::{ConnectionHandle, ConnectionState, Connector, PortFile};
use tracing::{debug, info, warn};

use crate::correlator::PendingTable;
use crate::error::{CallError, ClientError};
use crate::fallback::FallbackResponder;
use crate::router::route;
use crate::signals::{SignalEvent, SignalHub, SubscriptionHandle};
use crate::token::CancelToken;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Explicit port file path; the per-user default location if `None`.
    pub port_file: Option<PathBuf>,
    /// Framing and text encoding for this connection.
    pub wire: WireConfig,
    /// Wait slice for reply/cancellation polling. Cancellation is
    /// honored within one slice.
    pub poll_interval: Duration,
    /// Default per-call timeout when the caller doesn't pass one.
    pub call_timeout: Duration,
    /// Read timeout on the read-loop socket; bounds how fast the loop
    /// notices a deliberate disconnect.
    pub read_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            port_file: None,
            wire: WireConfig::default(),
            poll_interval: Duration::from_millis(10),
            call_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_millis(100),
        }
    }
}

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Overall deadline for this call; the config default if `None`.
    pub timeout: Option<Duration>,
    /// Cooperative cancellation token.
    pub cancel: Option<CancelToken>,
}

/// The daemon connection, as callers see it.
///
/// One `DaemonClient` is one logical connection: a single background
/// read loop (spawned exactly once, here), a serialized write path, and
/// the correlation/dispatch state shared between them. Any number of
/// threads may issue [`call`](Self::call)s concurrently.
pub struct DaemonClient {
    config: ClientConfig,
    handle: ConnectionHandle,
    state: Arc<ConnectionState>,
    sink: Mutex<FrameSink<TcpStream>>,
    pending: Arc<PendingTable>,
    signals: Arc<SignalHub>,
    fallback: FallbackResponder,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl DaemonClient {
    /// Discover the daemon's port and connect with default settings.
    pub fn connect() -> Result<Self, ClientError> {
        Self::connect_with(ClientConfig::default())
    }

    /// Connect with explicit configuration.
    ///
    /// No retry is performed; if the daemon isn't up yet the caller
    /// owns the backoff policy.
    pub fn connect_with(config: ClientConfig) -> Result<Self, ClientError> {
        let port_file = match &config.port_file {
            Some(path) => PortFile::at(path),
            None => PortFile::default_location()?,
        };

        let handle = Connector::connect_with(&port_file)?;
        let state = handle.state();
        let read_half = handle.read_half(Some(config.read_timeout))?;
        let write_half = handle.write_half()?;

        let sink = Mutex::new(FrameSink::with_config(write_half, config.wire.clone()));
        let source = FrameSource::with_config(read_half, config.wire.clone());

        let pending = Arc::new(PendingTable::new());
        let signals = Arc::new(SignalHub::new());

        let reader = {
            let state = Arc::clone(&state);
            let pending = Arc::clone(&pending);
            let signals = Arc::clone(&signals);
            std::thread::Builder::new()
                .name("synclink-read".into())
                .spawn(move || run_read_loop(source, state, pending, signals))
                .map_err(synclink_transport::TransportError::Io)?
        };

        Ok(Self {
            config,
            handle,
            state,
            sink,
            pending,
            signals,
            fallback: FallbackResponder::new(),
            reader: Mutex::new(Some(reader)),
        })
    }

    /// Whether the connection is currently believed live.
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// The daemon port this client connected to.
    pub fn port(&self) -> u16 {
        self.state.port()
    }

    /// Number of calls currently awaiting a reply.
    pub fn outstanding_calls(&self) -> usize {
        self.pending.outstanding()
    }

    /// Send a cataloged request and wait for its result.
    pub fn call(&self, kind: RequestKind, params: Value) -> Result<Value, CallError> {
        self.call_with(kind, params, CallOptions::default())
    }

    /// Send a cataloged request with per-call options.
    pub fn call_with(
        &self,
        kind: RequestKind,
        params: Value,
        options: CallOptions,
    ) -> Result<Value, CallError> {
        self.call_num(kind.num(), params, options)
    }

    /// Send a request by raw discriminant. Intended for diagnostics;
    /// prefer [`call`](Self::call) for cataloged kinds.
    pub fn call_num(
        &self,
        num: i32,
        params: Value,
        options: CallOptions,
    ) -> Result<Value, CallError> {
        if !self.state.is_connected() {
            debug!(num, "daemon unreachable, consulting local responder");
            return self.serve_fallback(num, &params);
        }

        let id = self.pending.next_id();
        let rx = self.pending.register(id);

        let request = Envelope::request(id, num, params.clone());
        let text = match request.to_json() {
            Ok(text) => text,
            Err(err) => {
                self.pending.remove(id);
                return Err(err.into());
            }
        };

        {
            let mut sink = self.sink.lock().expect("sink lock poisoned");
            if let Err(err) = sink.send(&text) {
                self.pending.remove(id);
                return Err(CallError::Transport(err));
            }
        }
        debug!(id, num, "request sent");

        let timeout = options.timeout.unwrap_or(self.config.call_timeout);
        let deadline = Instant::now() + timeout;
        loop {
            if options.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                self.pending.remove(id);
                debug!(id, "call cancelled before reply");
                return Err(CallError::Cancelled);
            }

            let now = Instant::now();
            if now >= deadline {
                self.pending.remove(id);
                warn!(id, num, ?timeout, "call timed out");
                return Err(CallError::TimedOut(timeout));
            }

            let slice = self.config.poll_interval.min(deadline - now);
            match rx.recv_timeout(slice) {
                Ok(reply) => {
                    if reply.is_unimplemented_reply() {
                        info!(id, num, "daemon reports kind unimplemented");
                        return self.serve_fallback(num, &params);
                    }
                    info!(id, num, served_by = "daemon", "call resolved");
                    return Ok(reply.result.unwrap_or(Value::Null));
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    warn!(id, num, "connection lost while call was pending");
                    return Err(CallError::ConnectionLost);
                }
            }
        }
    }

    fn serve_fallback(&self, num: i32, params: &Value) -> Result<Value, CallError> {
        let result = self.fallback.respond(num, params)?;
        info!(num, served_by = "fallback", "call resolved");
        Ok(result)
    }

    /// Register a handler for a signal kind.
    pub fn subscribe<F>(&self, kind: SignalKind, handler: F) -> SubscriptionHandle
    where
        F: Fn(&SignalEvent) + Send + Sync + 'static,
    {
        self.signals.subscribe(kind, handler)
    }

    /// Remove a signal subscription.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.signals.unsubscribe(handle)
    }

    /// Close the connection.
    ///
    /// The read loop exits, every pending call fails with
    /// `ConnectionLost`, and all signal subscriptions are dropped.
    /// Idempotent.
    pub fn disconnect(&self) {
        self.handle.disconnect();
        if let Some(reader) = self.reader.lock().expect("reader lock poisoned").take() {
            if reader.join().is_err() {
                warn!("read loop panicked during shutdown");
            }
        }
        self.signals.clear();
    }
}

impl Drop for DaemonClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for DaemonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaemonClient")
            .field("port", &self.state.port())
            .field("connected", &self.state.is_connected())
            .field("outstanding", &self.pending.outstanding())
            .finish()
    }
}

/// The single background driver of a connection.
///
/// Owns all socket reads and all frame routing. Exits when the peer
/// closes, the transport fails, or `disconnect()` flips the connected
/// flag; on the way out every still-pending call is failed.
fn run_read_loop(
    mut source: FrameSource<TcpStream>,
    state: Arc<ConnectionState>,
    pending: Arc<PendingTable>,
    signals: Arc<SignalHub>,
) {
    loop {
        match source.next_event() {
            Ok(ReadEvent::Frame(text)) => match Envelope::from_json(&text) {
                Ok(envelope) => route(envelope, &pending, &signals),
                Err(err) => warn!(%err, "unparseable frame dropped"),
            },
            Ok(ReadEvent::Idle) => {
                if !state.is_connected() {
                    debug!("read loop exiting after disconnect");
                    break;
                }
            }
            Err(FrameError::Desynchronized { discarded }) => {
                // Recoverable: the corrupt buffer is gone, assembly
                // resumes with the next chunk.
                warn!(discarded, resync = true, "stream desynchronized");
            }
            Err(FrameError::ConnectionClosed) => {
                if state.is_connected() {
                    warn!("daemon closed the connection");
                } else {
                    debug!("connection closed after disconnect");
                }
                break;
            }
            Err(err) => {
                warn!(%err, "fatal transport error in read loop");
                break;
            }
        }
    }

    state.mark_disconnected();
    let failed = pending.fail_all();
    if failed > 0 {
        warn!(failed, "pending calls failed with connection loss");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_length_prefixed_utf8() {
        let config = ClientConfig::default();
        assert_eq!(config.wire.framing, synclink_frame::Framing::LengthPrefixed);
        assert_eq!(
            config.wire.encoding,
            synclink_frame::TextEncoding::Utf8
        );
        assert!(config.poll_interval < config.call_timeout);
    }

    #[test]
    fn call_options_default_to_no_overrides() {
        let options = CallOptions::default();
        assert!(options.timeout.is_none());
        assert!(options.cancel.is_none());
    }
}
