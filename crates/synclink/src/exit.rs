use std::fmt;
use std::io;

use synclink_client::{CallError, ClientError};
use synclink_transport::ConnectError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const HEALTH_CHECK_FAILED: i32 = 30;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn connect_error(context: &str, err: ConnectError) -> CliError {
    match err {
        ConnectError::Refused { source, .. } => io_error(context, source),
        ConnectError::PortFileMissing { .. }
        | ConnectError::PortFileUnreadable { .. }
        | ConnectError::PortFileInvalid { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn client_error(context: &str, err: ClientError) -> CliError {
    match err {
        ClientError::Connect(err) => connect_error(context, err),
        ClientError::Transport(err) => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
    }
}

pub fn call_error(context: &str, err: CallError) -> CliError {
    match err {
        CallError::TimedOut(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        CallError::Cancelled => CliError::new(FAILURE, format!("{context}: {err}")),
        CallError::ConnectionLost | CallError::Transport(_) => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        CallError::Unsupported { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        CallError::Proto(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}
