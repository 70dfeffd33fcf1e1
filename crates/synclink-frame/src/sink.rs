use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::encode_frame;
use crate::error::{FrameError, Result};
use crate::{Framing, WireConfig};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete message frames to any `Write` stream.
///
/// Takes envelope text, applies the connection's text encoding and
/// framing, and writes the whole frame before returning.
pub struct FrameSink<T> {
    inner: T,
    buf: BytesMut,
    config: WireConfig,
}

impl<T: Write> FrameSink<T> {
    /// Create a sink with default wire configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, WireConfig::default())
    }

    /// Create a sink with explicit wire configuration.
    pub fn with_config(inner: T, config: WireConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Encode and write one message (blocking).
    pub fn send(&mut self, text: &str) -> Result<()> {
        let payload = self.config.encoding.encode(text);
        if payload.len() > self.config.max_frame_size {
            return Err(FrameError::FrameTooLarge {
                size: payload.len(),
                max: self.config.max_frame_size,
            });
        }

        self.buf.clear();
        match self.config.framing {
            Framing::LengthPrefixed => encode_frame(&payload, &mut self.buf)?,
            Framing::BraceDelimited => self.buf.extend_from_slice(&payload),
        }

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the sink and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current wire configuration.
    pub fn config(&self) -> &WireConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;

    use super::*;
    use crate::codec::{decode_frame, DEFAULT_MAX_FRAME};
    use crate::encoding::TextEncoding;

    #[test]
    fn writes_length_prefixed_frame() {
        let mut sink = FrameSink::new(Cursor::new(Vec::<u8>::new()));
        sink.send(r#"{"type":0,"id":1,"num":7}"#).unwrap();

        let mut wire = BytesMut::from(sink.into_inner().into_inner().as_slice());
        let frame = decode_frame(&mut wire, DEFAULT_MAX_FRAME).unwrap().unwrap();
        assert_eq!(frame.as_ref(), br#"{"type":0,"id":1,"num":7}"#);
        assert!(wire.is_empty());
    }

    #[test]
    fn writes_bare_payload_when_brace_delimited() {
        let config = WireConfig {
            framing: Framing::BraceDelimited,
            ..WireConfig::default()
        };
        let mut sink = FrameSink::with_config(Cursor::new(Vec::<u8>::new()), config);
        sink.send(r#"{"x":1}"#).unwrap();

        let written = sink.into_inner().into_inner();
        assert_eq!(written.as_slice(), br#"{"x":1}"#);
    }

    #[test]
    fn applies_utf16le_encoding() {
        let config = WireConfig {
            framing: Framing::BraceDelimited,
            encoding: TextEncoding::Utf16Le,
            ..WireConfig::default()
        };
        let mut sink = FrameSink::with_config(Cursor::new(Vec::<u8>::new()), config);
        sink.send("{}").unwrap();

        let written = sink.into_inner().into_inner();
        assert_eq!(written.as_slice(), &[b'{', 0, b'}', 0]);
    }

    #[test]
    fn oversized_message_rejected() {
        let config = WireConfig {
            max_frame_size: 4,
            ..WireConfig::default()
        };
        let mut sink = FrameSink::with_config(Cursor::new(Vec::<u8>::new()), config);

        let err = sink.send(r#"{"too":"big"}"#).unwrap_err();
        assert!(matches!(err, FrameError::FrameTooLarge { .. }));
    }

    #[test]
    fn zero_write_reports_connection_closed() {
        struct ZeroWriter;
        impl Write for ZeroWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut sink = FrameSink::new(ZeroWriter);
        let err = sink.send("{}").unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn retries_interrupted_writes() {
        struct InterruptedOnce {
            interrupted: bool,
            data: Vec<u8>,
        }
        impl Write for InterruptedOnce {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(std::io::Error::from(ErrorKind::Interrupted));
                }
                self.data.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut sink = FrameSink::new(InterruptedOnce {
            interrupted: false,
            data: Vec::new(),
        });
        sink.send("{}").unwrap();
        assert!(!sink.into_inner().data.is_empty());
    }
}
