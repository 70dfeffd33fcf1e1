use crate::error::{FrameError, Result};

/// Text encoding of the JSON payload on a connection.
///
/// Both encodings are observed in deployment; which one a daemon speaks
/// is connection configuration, not a compile-time constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8.
    #[default]
    Utf8,
    /// UTF-16 little-endian, no BOM.
    Utf16Le,
}

impl TextEncoding {
    /// Name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16le",
        }
    }

    /// Encode a string into this encoding's byte form.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf16Le => {
                let mut out = Vec::with_capacity(text.len() * 2);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
                out
            }
        }
    }

    /// Decode a complete byte buffer. Partial trailing sequences are an
    /// error here; use [`TextDecoder`] for chunked streams.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        let mut decoder = TextDecoder::new(self);
        let text = decoder.push(bytes)?;
        if decoder.has_pending() {
            return Err(FrameError::InvalidText {
                encoding: self.name(),
            });
        }
        Ok(text)
    }
}

/// Incremental decoder that tolerates arbitrary chunk boundaries.
///
/// A read may split a multi-byte UTF-8 sequence or a UTF-16 code unit /
/// surrogate pair anywhere; the partial tail is buffered and completed
/// by the next chunk.
#[derive(Debug)]
pub struct TextDecoder {
    encoding: TextEncoding,
    pending: Vec<u8>,
}

impl TextDecoder {
    /// Create a decoder for the given encoding.
    pub fn new(encoding: TextEncoding) -> Self {
        Self {
            encoding,
            pending: Vec::new(),
        }
    }

    /// The encoding this decoder speaks.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// True if bytes of an incomplete sequence are buffered.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Feed a chunk; returns all completed characters.
    pub fn push(&mut self, chunk: &[u8]) -> Result<String> {
        self.pending.extend_from_slice(chunk);
        match self.encoding {
            TextEncoding::Utf8 => self.drain_utf8(),
            TextEncoding::Utf16Le => self.drain_utf16le(),
        }
    }

    fn drain_utf8(&mut self) -> Result<String> {
        match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                let text = text.to_string();
                self.pending.clear();
                Ok(text)
            }
            Err(err) => {
                let valid = err.valid_up_to();
                if err.error_len().is_some() {
                    // Genuinely invalid bytes, not a split sequence.
                    self.pending.clear();
                    return Err(FrameError::InvalidText { encoding: "utf-8" });
                }
                let text = std::str::from_utf8(&self.pending[..valid])
                    .expect("validated prefix")
                    .to_string();
                self.pending.drain(..valid);
                Ok(text)
            }
        }
    }

    fn drain_utf16le(&mut self) -> Result<String> {
        let complete_units = self.pending.len() / 2;
        let units: Vec<u16> = self.pending[..complete_units * 2]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        let mut out = String::new();
        let mut consumed_units = 0;
        let mut i = 0;
        while i < units.len() {
            let unit = units[i];
            match unit {
                0xD800..=0xDBFF => {
                    // High surrogate; needs a trailing low surrogate.
                    let Some(&next) = units.get(i + 1) else {
                        // Split pair; wait for the next chunk.
                        break;
                    };
                    if !(0xDC00..=0xDFFF).contains(&next) {
                        self.pending.clear();
                        return Err(FrameError::InvalidText {
                            encoding: "utf-16le",
                        });
                    }
                    let combined =
                        0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(next) - 0xDC00);
                    out.push(char::from_u32(combined).expect("valid surrogate pair"));
                    i += 2;
                }
                0xDC00..=0xDFFF => {
                    // Low surrogate with no preceding high surrogate.
                    self.pending.clear();
                    return Err(FrameError::InvalidText {
                        encoding: "utf-16le",
                    });
                }
                _ => {
                    out.push(char::from_u32(u32::from(unit)).expect("non-surrogate unit"));
                    i += 1;
                }
            }
            consumed_units = i;
        }

        self.pending.drain(..consumed_units * 2);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passthrough() {
        let mut decoder = TextDecoder::new(TextEncoding::Utf8);
        assert_eq!(decoder.push(b"{\"x\":1}").unwrap(), "{\"x\":1}");
        assert!(!decoder.has_pending());
    }

    #[test]
    fn utf8_split_multibyte_sequence() {
        let bytes = "héllo".as_bytes();
        // Split in the middle of the two-byte 'é'.
        let mut decoder = TextDecoder::new(TextEncoding::Utf8);
        let first = decoder.push(&bytes[..2]).unwrap();
        assert_eq!(first, "h");
        assert!(decoder.has_pending());

        let rest = decoder.push(&bytes[2..]).unwrap();
        assert_eq!(rest, "éllo");
        assert!(!decoder.has_pending());
    }

    #[test]
    fn utf8_invalid_bytes_rejected() {
        let mut decoder = TextDecoder::new(TextEncoding::Utf8);
        let err = decoder.push(&[0x68, 0xff, 0x68]).unwrap_err();
        assert!(matches!(err, FrameError::InvalidText { encoding: "utf-8" }));
    }

    #[test]
    fn utf16le_roundtrip() {
        let text = "{\"name\":\"drive\"}";
        let bytes = TextEncoding::Utf16Le.encode(text);
        assert_eq!(TextEncoding::Utf16Le.decode(&bytes).unwrap(), text);
    }

    #[test]
    fn utf16le_odd_byte_boundary() {
        let bytes = TextEncoding::Utf16Le.encode("ab");
        let mut decoder = TextDecoder::new(TextEncoding::Utf16Le);

        let first = decoder.push(&bytes[..1]).unwrap();
        assert_eq!(first, "");
        assert!(decoder.has_pending());

        let rest = decoder.push(&bytes[1..]).unwrap();
        assert_eq!(rest, "ab");
        assert!(!decoder.has_pending());
    }

    #[test]
    fn utf16le_split_surrogate_pair() {
        let text = "a𝄞b"; // U+1D11E, a surrogate pair in UTF-16
        let bytes = TextEncoding::Utf16Le.encode(text);
        assert_eq!(bytes.len(), 8);

        let mut decoder = TextDecoder::new(TextEncoding::Utf16Le);
        // "a" plus the high surrogate only.
        let first = decoder.push(&bytes[..4]).unwrap();
        assert_eq!(first, "a");
        assert!(decoder.has_pending());

        let rest = decoder.push(&bytes[4..]).unwrap();
        assert_eq!(rest, "𝄞b");
        assert!(!decoder.has_pending());
    }

    #[test]
    fn utf16le_lone_low_surrogate_rejected() {
        let mut decoder = TextDecoder::new(TextEncoding::Utf16Le);
        let err = decoder.push(&0xDC00u16.to_le_bytes()).unwrap_err();
        assert!(matches!(
            err,
            FrameError::InvalidText {
                encoding: "utf-16le"
            }
        ));
    }

    #[test]
    fn utf16le_high_surrogate_without_low_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0xD800u16.to_le_bytes());
        bytes.extend_from_slice(&(b'x' as u16).to_le_bytes());

        let mut decoder = TextDecoder::new(TextEncoding::Utf16Le);
        let err = decoder.push(&bytes).unwrap_err();
        assert!(matches!(err, FrameError::InvalidText { .. }));
    }

    #[test]
    fn byte_at_a_time_matches_whole_buffer() {
        let text = "{\"path\":\"C:\\\\Users\\\\John\"}";
        for encoding in [TextEncoding::Utf8, TextEncoding::Utf16Le] {
            let bytes = encoding.encode(text);
            let mut decoder = TextDecoder::new(encoding);
            let mut assembled = String::new();
            for byte in &bytes {
                assembled.push_str(&decoder.push(std::slice::from_ref(byte)).unwrap());
            }
            assert_eq!(assembled, text);
            assert!(!decoder.has_pending());
        }
    }
}
