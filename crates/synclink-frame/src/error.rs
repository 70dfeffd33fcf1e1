/// Errors that can occur during framing, reassembly, or text decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A frame exceeds the configured maximum size.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,

    /// The reassembly buffer no longer starts at a message boundary.
    /// The buffer has been discarded; assembly resumes at the next chunk.
    #[error("stream desynchronized ({discarded} chars discarded)")]
    Desynchronized { discarded: usize },

    /// The byte stream is not valid in the configured text encoding.
    #[error("invalid {encoding} sequence in stream")]
    InvalidText { encoding: &'static str },
}

pub type Result<T> = std::result::Result<T, FrameError>;
