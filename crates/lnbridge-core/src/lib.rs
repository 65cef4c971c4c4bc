//! lnbridge core: runtime-free protocol primitives for talking to a wallet node
//! through a native bridge.
//!
//! This crate defines the wire-level contracts shared by the node client and
//! host tooling: the error surface, request envelopes, the message codec,
//! stream event notifications, and the typed RPC method schemas. It carries
//! no runtime dependencies so codecs can be exercised from any thread.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed replies from the node surface as `BridgeError` instead of
//! crashing the host process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod rpc;

/// Shared result type.
pub use error::{BridgeError, ErrorCode, Result};
pub use protocol::{EventKind, RequestEnvelope, StreamEvent, StreamId};
