//! Daemon connection transport for synclink.
//!
//! The synchronization daemon publishes its listening TCP port in a
//! one-line per-user file. This crate resolves that file, opens the
//! loopback connection, and owns the resulting stream: cloned read and
//! write halves, read timeouts, and the process-wide connected flag.

pub mod conn;
pub mod error;
pub mod portfile;

pub use conn::{ConnectionHandle, ConnectionState, Connector};
pub use error::{ConnectError, Result, TransportError};
pub use portfile::{PortFile, DEFAULT_PORT_FILE_NAME, PORT_FILE_ENV};
