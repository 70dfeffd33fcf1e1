//! Helpers for the daemon's binary-in-JSON payload convention.
//!
//! Text and binary sub-fields inside `params`/`result` (display names,
//! filesystem paths, avatar images) arrive as base64 strings so the
//! envelope stays plain text on the wire.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{ProtoError, Result};

/// Encode a text field the way the daemon expects it.
pub fn encode_text_field(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decode a base64 text field into a UTF-8 string.
pub fn decode_text_field(encoded: &str) -> Result<String> {
    let bytes = STANDARD.decode(encoded).map_err(ProtoError::Base64)?;
    String::from_utf8(bytes).map_err(ProtoError::Utf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_field_roundtrips() {
        let encoded = encode_text_field("John's Drive");
        assert_eq!(decode_text_field(&encoded).unwrap(), "John's Drive");
    }

    #[test]
    fn decodes_known_daemon_encoding() {
        // "hello" as the daemon would send it.
        assert_eq!(decode_text_field("aGVsbG8=").unwrap(), "hello");
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = decode_text_field("not base64!").unwrap_err();
        assert!(matches!(err, ProtoError::Base64(_)));
    }

    #[test]
    fn rejects_non_utf8_contents() {
        let encoded = STANDARD.encode([0xff, 0xfe, 0x00]);
        let err = decode_text_field(&encoded).unwrap_err();
        assert!(matches!(err, ProtoError::Utf8(_)));
    }
}
