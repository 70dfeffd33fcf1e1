//! Message-level protocol types for the synclink daemon link.
//!
//! One wire message is an [`Envelope`]: a JSON object carrying a message
//! kind (request, reply, or signal), a correlation id, a numeric
//! discriminant into the request or signal catalog, and the payload.
//! The catalogs are closed at build time; unknown numbers observed on
//! the wire are preserved as raw integers rather than rejected.

pub mod catalog;
pub mod envelope;
pub mod error;
pub mod payload;

pub use catalog::{RequestKind, SignalKind};
pub use envelope::{Envelope, MessageKind, UNIMPLEMENTED_NUM};
pub use error::{ProtoError, Result};
pub use payload::{decode_text_field, encode_text_field};
