//! Adapter over the host's native node module.
//!
//! The native module speaks text only: base64 payloads in and out, string
//! errors, and JSON event notifications pushed through an [`EventSink`].
//! `NativeTransport` turns that surface into a [`BridgeTransport`].

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashSet;
use tokio::sync::mpsc;
use tokio::time::Instant;

use lnbridge_core::error::{BridgeError, Result};
use lnbridge_core::protocol::{codec, StreamEvent, StreamId};

use crate::transport::{BridgeTransport, EventFeed};

/// String-level surface exposed by the host (mobile bindings, test doubles).
///
/// Errors are the host's rejection messages.
#[async_trait]
pub trait NativeBridge: Send + Sync {
    async fn invoke(&self, method: &str, payload: String) -> std::result::Result<String, String>;
    async fn open_stream(
        &self,
        method: &str,
        stream_id: &str,
        payload: String,
    ) -> std::result::Result<(), String>;
    async fn write_stream(&self, stream_id: &str, payload: String) -> std::result::Result<(), String>;
    async fn close_stream(&self, stream_id: &str) -> std::result::Result<(), String>;
}

/// Host-side handle used to push event notifications onto the shared feed.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::Sender<StreamEvent>,
}

impl EventSink {
    pub async fn deliver(&self, ev: StreamEvent) -> Result<()> {
        self.tx
            .send(ev)
            .await
            .map_err(|_| BridgeError::Transport("event feed closed".into()))
    }

    /// Parse and deliver one JSON notification.
    pub async fn deliver_json(&self, json: &str) -> Result<()> {
        let ev = StreamEvent::from_json(json).map_err(|e| {
            tracing::warn!(error = %e, "rejecting malformed event notification");
            e
        })?;
        self.deliver(ev).await
    }

    /// Non-async variant for host callbacks running outside the runtime.
    pub fn try_deliver_json(&self, json: &str) -> Result<()> {
        let ev = StreamEvent::from_json(json)?;
        self.tx.try_send(ev).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => BridgeError::Transport("event feed full".into()),
            mpsc::error::TrySendError::Closed(_) => BridgeError::Transport("event feed closed".into()),
        })
    }
}

pub struct NativeTransport {
    native: Arc<dyn NativeBridge>,
    open: DashSet<StreamId>,
    sink: EventSink,
    feed: Mutex<Option<mpsc::Receiver<StreamEvent>>>,
}

impl NativeTransport {
    /// `capacity` bounds the shared event feed.
    pub fn new(native: Arc<dyn NativeBridge>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            native,
            open: DashSet::new(),
            sink: EventSink { tx },
            feed: Mutex::new(Some(rx)),
        }
    }

    /// Sink the host uses to push notifications.
    pub fn sink(&self) -> EventSink {
        self.sink.clone()
    }

    /// Streams opened and not yet closed.
    pub fn open_streams(&self) -> usize {
        self.open.len()
    }
}

#[async_trait]
impl BridgeTransport for NativeTransport {
    async fn call(&self, method: &str, request: Bytes) -> Result<Bytes> {
        let started = Instant::now();
        tracing::debug!(%method, "native invoke");

        let reply = self
            .native
            .invoke(method, codec::to_text(&request))
            .await
            .map_err(|e| {
                tracing::debug!(%method, elapsed_ms = started.elapsed().as_millis() as u64, error = %e, "native invoke rejected");
                BridgeError::Transport(e)
            })?;

        tracing::debug!(%method, elapsed_ms = started.elapsed().as_millis() as u64, "native reply");
        codec::from_text(&reply)
    }

    async fn open_stream(&self, method: &str, stream_id: &StreamId, request: Bytes) -> Result<()> {
        self.open.insert(stream_id.clone());
        if let Err(e) = self
            .native
            .open_stream(method, stream_id.as_str(), codec::to_text(&request))
            .await
        {
            self.open.remove(stream_id);
            return Err(BridgeError::Transport(e));
        }
        Ok(())
    }

    async fn write_stream(&self, stream_id: &StreamId, frame: Bytes) -> Result<()> {
        if !self.open.contains(stream_id) {
            return Err(BridgeError::StreamClosed(stream_id.to_string()));
        }
        self.native
            .write_stream(stream_id.as_str(), codec::to_text(&frame))
            .await
            .map_err(BridgeError::Transport)
    }

    async fn close_stream(&self, stream_id: &StreamId) -> Result<()> {
        if self.open.remove(stream_id).is_none() {
            return Ok(());
        }
        self.native
            .close_stream(stream_id.as_str())
            .await
            .map_err(BridgeError::Transport)
    }

    fn events(&self) -> Result<EventFeed> {
        let mut slot = self
            .feed
            .lock()
            .map_err(|_| BridgeError::Internal("event feed lock poisoned".into()))?;
        slot.take()
            .map(EventFeed::new)
            .ok_or_else(|| BridgeError::Internal("event feed already taken".into()))
    }
}
