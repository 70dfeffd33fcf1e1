use std::time::Duration;

/// Errors that can occur while establishing the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Port discovery or the TCP connection failed.
    #[error("connect failed: {0}")]
    Connect(#[from] synclink_transport::ConnectError),

    /// The connection opened but splitting it into halves failed.
    #[error("transport setup failed: {0}")]
    Transport(#[from] synclink_transport::TransportError),
}

/// Failure outcomes of a single call.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// Writing the request or reading its reply failed mid-session.
    #[error("transport error: {0}")]
    Transport(#[from] synclink_frame::FrameError),

    /// The connection died while the call was pending.
    #[error("connection lost while call was pending")]
    ConnectionLost,

    /// The caller's cancellation token fired before the reply arrived.
    #[error("call cancelled")]
    Cancelled,

    /// No reply arrived within the allotted time.
    #[error("call timed out after {0:?}")]
    TimedOut(Duration),

    /// Neither the daemon nor the local responder can answer this kind.
    #[error("request kind {num} is unsupported")]
    Unsupported { num: i32 },

    /// The envelope could not be serialized or the reply parsed.
    #[error("protocol error: {0}")]
    Proto(#[from] synclink_proto::ProtoError),
}

pub type Result<T> = std::result::Result<T, CallError>;
