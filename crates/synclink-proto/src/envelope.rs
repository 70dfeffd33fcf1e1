use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtoError;

/// Reply `num` the daemon uses for "request kind not implemented".
///
/// The request catalog starts at 1, so 0 never collides with a real
/// kind. A reply carrying this value tells the client to answer the
/// call from its local responder instead.
pub const UNIMPLEMENTED_NUM: i32 = 0;

/// Message kind discriminant, serialized as the integers 0/1/2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MessageKind {
    /// Client-to-daemon request; expects a correlated reply.
    Request,
    /// Daemon-to-client reply, correlated by `id`.
    Reply,
    /// Unsolicited daemon-to-client notification; `id` is meaningless.
    Signal,
}

impl From<MessageKind> for u8 {
    fn from(kind: MessageKind) -> u8 {
        match kind {
            MessageKind::Request => 0,
            MessageKind::Reply => 1,
            MessageKind::Signal => 2,
        }
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = ProtoError;

    fn try_from(value: u8) -> Result<Self, ProtoError> {
        match value {
            0 => Ok(MessageKind::Request),
            1 => Ok(MessageKind::Reply),
            2 => Ok(MessageKind::Signal),
            other => Err(ProtoError::UnknownKind(other)),
        }
    }
}

/// One complete wire message.
///
/// `params` is present on requests and signals, `result` only on
/// replies. Binary sub-fields inside either are base64-encoded strings
/// so the whole envelope stays one self-delimited text object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Correlation id. Unique among outstanding requests on the
    /// connection, monotonically increasing, meaningless for signals.
    pub id: i64,
    /// Discriminant into the request or signal catalog.
    pub num: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl Envelope {
    /// Build a request envelope.
    pub fn request(id: i64, num: i32, params: Value) -> Self {
        Self {
            kind: MessageKind::Request,
            id,
            num,
            params: Some(params),
            result: None,
        }
    }

    /// Build a reply envelope.
    pub fn reply(id: i64, num: i32, result: Value) -> Self {
        Self {
            kind: MessageKind::Reply,
            id,
            num,
            params: None,
            result: Some(result),
        }
    }

    /// Build a signal envelope.
    pub fn signal(num: i32, params: Value) -> Self {
        Self {
            kind: MessageKind::Signal,
            id: 0,
            num,
            params: Some(params),
            result: None,
        }
    }

    /// Whether this reply marks the request kind as unimplemented
    /// daemon-side.
    pub fn is_unimplemented_reply(&self) -> bool {
        self.kind == MessageKind::Reply && self.num == UNIMPLEMENTED_NUM
    }

    /// Serialize to the wire text form.
    pub fn to_json(&self) -> Result<String, ProtoError> {
        serde_json::to_string(self).map_err(ProtoError::Json)
    }

    /// Parse from the wire text form.
    pub fn from_json(text: &str) -> Result<Self, ProtoError> {
        serde_json::from_str(text).map_err(ProtoError::Json)
    }
}
