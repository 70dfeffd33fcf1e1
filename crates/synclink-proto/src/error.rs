/// Errors that can occur at the message-protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// The envelope JSON could not be serialized or deserialized.
    #[error("envelope JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The envelope declared an unknown message kind.
    #[error("unknown message kind {0}")]
    UnknownKind(u8),

    /// A base64-encoded payload field failed to decode.
    #[error("invalid base64 payload field: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A decoded payload field is not valid UTF-8.
    #[error("payload field is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, ProtoError>;
