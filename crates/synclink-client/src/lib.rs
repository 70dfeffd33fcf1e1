//! High-level client for the synclink daemon connection.
//!
//! This is the layer GUI code talks to. One [`DaemonClient`] owns one
//! logical connection: a background read loop feeds the frame
//! assembler and routes every completed message, replies wake their
//! originating [`call`](DaemonClient::call) wherever it is waiting, and
//! unsolicited signals fan out to subscribers. Request kinds the daemon
//! doesn't implement are answered by a local [`FallbackResponder`],
//! observably but transparently to the caller.

pub mod client;
pub mod correlator;
pub mod error;
pub mod fallback;
pub mod router;
pub mod signals;
pub mod token;

pub use client::{CallOptions, ClientConfig, DaemonClient};
pub use correlator::PendingTable;
pub use error::{CallError, ClientError, Result};
pub use fallback::FallbackResponder;
pub use router::route;
pub use signals::{SignalEvent, SignalHub, SubscriptionHandle};
pub use token::CancelToken;
