//! Bridge transport: the single channel to the external node process.
//!
//! Two primitives cross the bridge:
//! - one-shot `call` (request bytes in, exactly one reply out)
//! - streams opened by correlation id, whose events all arrive on one shared
//!   [`EventFeed`] in arrival order (per-id order is preserved, cross-id order
//!   is not).
//!
//! The transport never retries and never interprets payloads.

pub mod native;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use lnbridge_core::error::Result;
use lnbridge_core::protocol::{StreamEvent, StreamId};

pub use native::{EventSink, NativeBridge, NativeTransport};

/// The shared feed of stream events for every open stream.
///
/// There is exactly one feed per transport; the multiplexer owns it.
pub struct EventFeed {
    rx: mpsc::Receiver<StreamEvent>,
}

impl EventFeed {
    pub(crate) fn new(rx: mpsc::Receiver<StreamEvent>) -> Self {
        Self { rx }
    }

    /// Next event in arrival order. `None` once every sink is gone.
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        self.rx.recv().await
    }
}

#[async_trait]
pub trait BridgeTransport: Send + Sync {
    /// Send one request and await exactly one reply.
    async fn call(&self, method: &str, request: Bytes) -> Result<Bytes>;

    /// Register an outstanding stream. Data arrives later on the event feed.
    async fn open_stream(&self, method: &str, stream_id: &StreamId, request: Bytes) -> Result<()>;

    /// Push a further frame into an open stream. Fails if the stream is closed.
    async fn write_stream(&self, stream_id: &StreamId, frame: Bytes) -> Result<()>;

    /// Ask the node to release the stream. Idempotent.
    async fn close_stream(&self, stream_id: &StreamId) -> Result<()>;

    /// Take the shared event feed. Fails if it was already taken.
    fn events(&self) -> Result<EventFeed>;
}
