//! Protocol modules (envelopes, codec, stream events).
//!
//! The bridge speaks two layers:
//! - Binary lane: a version byte followed by a bincode body per method schema.
//! - Text lane: base64 of the binary lane, plus JSON event notifications
//!   carrying a stream id, an event type and an optional payload.
//!
//! All parsers are panic-free: malformed input is reported as `BridgeError`
//! instead of panicking or indexing raw buffers.

pub mod codec;
pub mod envelope;
pub mod event;

pub use envelope::{RequestEnvelope, StreamId};
pub use event::{EventKind, EventNotification, EventPayload, StreamEvent};
