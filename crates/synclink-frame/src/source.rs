use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::assembler::FrameAssembler;
use crate::codec::decode_frame;
use crate::encoding::TextDecoder;
use crate::error::{FrameError, Result};
use crate::{Framing, WireConfig};

const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Outcome of one [`FrameSource::next_event`] call.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadEvent {
    /// A complete message, decoded to text.
    Frame(String),
    /// The read timed out with no complete message available. The
    /// caller can check for shutdown and come back.
    Idle,
}

/// Pulls complete message frames from any `Read` stream.
///
/// Handles partial reads, the connection's framing variant, and
/// incremental text decoding internally — callers only ever see whole
/// messages.
pub struct FrameSource<T> {
    inner: T,
    config: WireConfig,
    raw: BytesMut,
    decoder: TextDecoder,
    assembler: FrameAssembler,
    ready: VecDeque<String>,
}

impl<T: Read> FrameSource<T> {
    /// Create a source with default wire configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, WireConfig::default())
    }

    /// Create a source with explicit wire configuration.
    pub fn with_config(inner: T, config: WireConfig) -> Self {
        Self {
            inner,
            decoder: TextDecoder::new(config.encoding),
            assembler: FrameAssembler::new(),
            config,
            raw: BytesMut::with_capacity(READ_CHUNK_SIZE),
            ready: VecDeque::new(),
        }
    }

    /// Block until the next complete frame, a read timeout, or an error.
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` at EOF. A
    /// `Desynchronized` error discards the corrupt buffer; the source
    /// remains usable and resumes with the next chunk.
    pub fn next_event(&mut self) -> Result<ReadEvent> {
        loop {
            if let Some(frame) = self.ready.pop_front() {
                return Ok(ReadEvent::Frame(frame));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if err.kind() == ErrorKind::WouldBlock
                        || err.kind() == ErrorKind::TimedOut =>
                {
                    return Ok(ReadEvent::Idle);
                }
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.ingest(&chunk[..read])?;
        }
    }

    /// Consume the source and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn ingest(&mut self, bytes: &[u8]) -> Result<()> {
        match self.config.framing {
            Framing::LengthPrefixed => {
                self.raw.extend_from_slice(bytes);
                while let Some(payload) = decode_frame(&mut self.raw, self.config.max_frame_size)? {
                    let text = self.config.encoding.decode(&payload)?;
                    self.ready.push_back(text);
                }
            }
            Framing::BraceDelimited => {
                let text = self.decoder.push(bytes)?;
                self.assembler.push(&text);
                while let Some(frame) = self.assembler.next_frame()? {
                    self.ready.push_back(frame);
                }
            }
        }
        Ok(())
    }
}
