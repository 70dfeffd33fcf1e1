use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::encoding::TextEncoding;
use crate::error::{FrameError, Result};
use crate::Framing;

/// Length header size: a single 4-byte big-endian payload length.
pub const HEADER_SIZE: usize = 4;

/// Default maximum frame size: 16 MiB.
pub const DEFAULT_MAX_FRAME: usize = 16 * 1024 * 1024;

/// Per-connection wire configuration.
///
/// Framing and text encoding vary between daemon deployments; the
/// correlation and dispatch layers above are identical for all of them.
#[derive(Debug, Clone)]
pub struct WireConfig {
    /// Framing scheme.
    pub framing: Framing,
    /// Text encoding of the JSON payload.
    pub encoding: TextEncoding,
    /// Maximum accepted frame size in bytes.
    pub max_frame_size: usize,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            framing: Framing::LengthPrefixed,
            encoding: TextEncoding::Utf8,
            max_frame_size: DEFAULT_MAX_FRAME,
        }
    }
}

/// Encode a length-prefixed frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────────┬──────────────────┐
/// │ Length (4B BE) │ Payload (N bytes)│
/// └────────────────┴──────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > u32::MAX as usize {
        return Err(FrameError::FrameTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u32(payload.len() as u32);
    dst.put_slice(payload);
    Ok(())
}

/// Decode a length-prefixed frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_frame_size: usize) -> Result<Option<Bytes>> {
    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    let payload_len = u32::from_be_bytes(src[0..4].try_into().expect("4-byte slice")) as usize;
    if payload_len > max_frame_size {
        return Err(FrameError::FrameTooLarge {
            size: payload_len,
            max: max_frame_size,
        });
    }

    let total = HEADER_SIZE + payload_len;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    src.advance(HEADER_SIZE);
    Ok(Some(src.split_to(payload_len).freeze()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let mut buf = BytesMut::new();
        let payload = br#"{"type":0,"id":1,"num":7,"params":{}}"#;

        encode_frame(payload, &mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE + payload.len());

        let frame = decode_frame(&mut buf, DEFAULT_MAX_FRAME).unwrap().unwrap();
        assert_eq!(frame.as_ref(), payload);
        assert!(buf.is_empty());
    }

    #[test]
    fn length_header_is_big_endian() {
        let mut buf = BytesMut::new();
        encode_frame(b"abcde", &mut buf).unwrap();
        assert_eq!(&buf[0..4], &[0, 0, 0, 5]);
    }

    #[test]
    fn decode_incomplete_header() {
        let mut buf = BytesMut::from(&[0x00, 0x00][..]);
        let result = decode_frame(&mut buf, DEFAULT_MAX_FRAME).unwrap();
        assert!(result.is_none());
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn decode_incomplete_payload() {
        let mut buf = BytesMut::new();
        encode_frame(b"hello", &mut buf).unwrap();
        buf.truncate(HEADER_SIZE + 2);

        let result = decode_frame(&mut buf, DEFAULT_MAX_FRAME).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn decode_frame_too_large() {
        let mut buf = BytesMut::new();
        buf.put_u32(1024 * 1024 * 32); // 32 MiB

        let result = decode_frame(&mut buf, DEFAULT_MAX_FRAME);
        assert!(matches!(result, Err(FrameError::FrameTooLarge { .. })));
    }

    #[test]
    fn multiple_frames_in_one_buffer() {
        let mut buf = BytesMut::new();
        encode_frame(b"first", &mut buf).unwrap();
        encode_frame(b"second", &mut buf).unwrap();

        let f1 = decode_frame(&mut buf, DEFAULT_MAX_FRAME).unwrap().unwrap();
        assert_eq!(f1.as_ref(), b"first");

        let f2 = decode_frame(&mut buf, DEFAULT_MAX_FRAME).unwrap().unwrap();
        assert_eq!(f2.as_ref(), b"second");

        assert!(buf.is_empty());
    }

    #[test]
    fn empty_payload() {
        let mut buf = BytesMut::new();
        encode_frame(b"", &mut buf).unwrap();

        let frame = decode_frame(&mut buf, DEFAULT_MAX_FRAME).unwrap().unwrap();
        assert!(frame.is_empty());
    }
}
