use std::path::PathBuf;

/// Errors that can occur while establishing the daemon connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The per-user port file does not exist.
    #[error("port file not found: {path}")]
    PortFileMissing { path: PathBuf },

    /// The port file exists but could not be read.
    #[error("failed to read port file {path}: {source}")]
    PortFileUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The port file contents are not a valid TCP port.
    #[error("port file {path} does not contain a valid port: {contents:?}")]
    PortFileInvalid { path: PathBuf, contents: String },

    /// The daemon refused or failed the TCP connection.
    #[error("failed to connect to localhost:{port}: {source}")]
    Refused { port: u16, source: std::io::Error },

    /// The user's home directory could not be determined.
    #[error("cannot locate home directory for port file lookup")]
    NoHomeDir,
}

/// Errors that can occur on an established connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred while reading or writing the stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection has been closed.
    #[error("connection closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;
