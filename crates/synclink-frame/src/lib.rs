//! Message framing and stream reassembly for the daemon link.
//!
//! The daemon speaks JSON envelopes over a byte stream. Two framing
//! schemes exist in deployment and both are supported as connection
//! configuration, never as hardcoded constants:
//!
//! - [`Framing::LengthPrefixed`] — a 4-byte big-endian payload length
//!   followed by exactly that many bytes. The default and preferred
//!   scheme.
//! - [`Framing::BraceDelimited`] — no explicit length; message
//!   boundaries are detected by brace balance over the decoded text,
//!   ignoring braces inside JSON string literals.
//!
//! Text encoding (UTF-8 or UTF-16LE) is likewise per-connection; the
//! incremental [`TextDecoder`] carries partial code units across
//! arbitrarily-split chunks so fragmentation cannot corrupt the text.

pub mod assembler;
pub mod codec;
pub mod encoding;
pub mod error;
pub mod sink;
pub mod source;

pub use assembler::FrameAssembler;
pub use codec::{decode_frame, encode_frame, WireConfig, DEFAULT_MAX_FRAME, HEADER_SIZE};
pub use encoding::{TextDecoder, TextEncoding};
pub use error::{FrameError, Result};
pub use sink::FrameSink;
pub use source::{FrameSource, ReadEvent};

/// Framing scheme used on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// 4-byte big-endian length header, then the payload.
    #[default]
    LengthPrefixed,
    /// Self-delimiting JSON objects, boundaries found by brace balance.
    BraceDelimited,
}
