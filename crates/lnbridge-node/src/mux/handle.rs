//! Stream handles.
//!
//! [`RawStream`] is the untyped read/write/cancel side of one correlation id.
//! [`StreamHandle`] decodes it per method schema.
//!
//! Lifecycle: `Open` until a terminal event is read (`Finished`) or the caller
//! cancels (`Cancelled`). Dropping an open handle tears the stream down.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use futures_util::Stream;
use tokio::sync::mpsc;

use lnbridge_core::error::{BridgeError, Result};
use lnbridge_core::protocol::{codec, EventKind, EventPayload, StreamEvent, StreamId};
use lnbridge_core::rpc::{Bidi, Streaming};

use crate::mux::{Multiplexer, Teardown};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Finished,
    Cancelled,
}

pub struct RawStream {
    id: StreamId,
    method: Arc<str>,
    rx: mpsc::UnboundedReceiver<StreamEvent>,
    mux: Arc<Multiplexer>,
    cancelled: Arc<AtomicBool>,
    state: State,
}

impl RawStream {
    pub(crate) fn new(
        id: StreamId,
        method: Arc<str>,
        rx: mpsc::UnboundedReceiver<StreamEvent>,
        mux: Arc<Multiplexer>,
    ) -> Self {
        Self {
            id,
            method,
            rx,
            mux,
            cancelled: Arc::new(AtomicBool::new(false)),
            state: State::Open,
        }
    }

    pub fn id(&self) -> &StreamId {
        &self.id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn is_open(&self) -> bool {
        self.state == State::Open && !self.is_cancelled()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == State::Cancelled || self.cancelled.load(Ordering::SeqCst)
    }

    /// Cancels this stream from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            id: self.id.clone(),
            cancelled: Arc::clone(&self.cancelled),
            mux: Arc::clone(&self.mux),
        }
    }

    /// Next event for this id, terminal included. `None` after the terminal
    /// event or once cancelled.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        if self.state != State::Open {
            return None;
        }
        if self.cancelled.load(Ordering::SeqCst) {
            self.state = State::Cancelled;
            return None;
        }

        let received = self.rx.recv().await;

        // Anything still queued after a cancel is suppressed.
        if self.cancelled.load(Ordering::SeqCst) {
            self.state = State::Cancelled;
            return None;
        }

        match received {
            Some(ev) => {
                if ev.kind.is_terminal() {
                    self.state = State::Finished;
                }
                Some(ev)
            }
            None => {
                self.state = State::Finished;
                Some(StreamEvent::error(self.id.clone(), "stream route closed"))
            }
        }
    }

    /// Push a frame on the write side.
    pub async fn write(&self, frame: Bytes) -> Result<()> {
        if self.is_cancelled() {
            return Err(BridgeError::Cancelled);
        }
        if self.state == State::Finished {
            return Err(BridgeError::StreamClosed(self.id.to_string()));
        }
        self.mux.write(&self.id, frame).await
    }

    /// Stop delivery, unregister and close. No-op if the stream already
    /// terminated.
    pub async fn cancel(mut self) {
        if self.state != State::Open {
            return;
        }
        self.state = State::Cancelled;
        self.cancelled.store(true, Ordering::SeqCst);
        self.rx.close();
        if self.mux.release(&self.id, Teardown::Cancel).await {
            tracing::debug!(method = %self.method, stream_id = %self.id, "stream cancelled");
        }
    }
}

impl Drop for RawStream {
    fn drop(&mut self) {
        if self.state == State::Open {
            self.mux.release_detached(&self.id, Teardown::Drop);
        }
    }
}

/// Cloneable cancellation control for one stream.
#[derive(Clone)]
pub struct CancelHandle {
    id: StreamId,
    cancelled: Arc<AtomicBool>,
    mux: Arc<Multiplexer>,
}

impl CancelHandle {
    pub fn stream_id(&self) -> &StreamId {
        &self.id
    }

    /// Returns true if this call performed the teardown, false if the stream
    /// had already terminated or been cancelled.
    pub async fn cancel(&self) -> bool {
        self.cancelled.store(true, Ordering::SeqCst);
        self.mux.release(&self.id, Teardown::Cancel).await
    }
}

/// Typed handle for a streaming method.
pub struct StreamHandle<M: Streaming> {
    raw: RawStream,
    completion: Option<Bytes>,
    _method: PhantomData<fn() -> M>,
}

impl<M: Streaming> StreamHandle<M> {
    pub(crate) fn new(raw: RawStream) -> Self {
        Self {
            raw,
            completion: None,
            _method: PhantomData,
        }
    }

    pub fn id(&self) -> &StreamId {
        self.raw.id()
    }

    pub fn is_cancelled(&self) -> bool {
        self.raw.is_cancelled()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.raw.cancel_handle()
    }

    /// Next data item.
    ///
    /// `Some(Ok(_))` per `data` event, `Some(Err(_))` for a node `error` or an
    /// undecodable payload, `None` once the stream ended or was cancelled.
    /// `status` events are logged and skipped.
    pub async fn next(&mut self) -> Option<Result<M::Response>> {
        loop {
            let ev = self.raw.next_event().await?;
            match ev.kind {
                EventKind::Data => {
                    return Some(match ev.payload {
                        EventPayload::Bytes(b) => codec::decode(b),
                        _ => Err(BridgeError::Decode("data event without payload".into())),
                    });
                }
                EventKind::Status => {
                    tracing::info!(method = M::NAME, stream_id = %ev.stream_id, status = ev.text().unwrap_or(""), "stream status");
                }
                EventKind::Error => {
                    let msg = ev.text().unwrap_or("unknown stream error").to_string();
                    tracing::debug!(method = M::NAME, stream_id = %ev.stream_id, error = %msg, "stream error");
                    return Some(Err(BridgeError::Node(msg)));
                }
                EventKind::End => {
                    tracing::debug!(method = M::NAME, stream_id = %ev.stream_id, "stream end");
                    if let EventPayload::Bytes(b) = ev.payload {
                        self.completion = Some(b);
                    }
                    return None;
                }
            }
        }
    }

    /// Final payload carried by the `end` event, if any.
    pub fn take_completion(&mut self) -> Option<Result<M::Response>> {
        self.completion.take().map(codec::decode)
    }

    /// Drive the stream to completion, calling `on_data` per data item.
    ///
    /// Resolves with the `end` payload if the node sent one. A cancel through
    /// a [`CancelHandle`] resolves with `Cancelled`.
    pub async fn run<F>(mut self, mut on_data: F) -> Result<Option<M::Response>>
    where
        F: FnMut(M::Response),
    {
        while let Some(item) = self.next().await {
            on_data(item?);
        }
        if self.is_cancelled() {
            return Err(BridgeError::Cancelled);
        }
        self.take_completion().transpose()
    }

    pub async fn cancel(self) {
        self.raw.cancel().await
    }

    /// Adapt into a `Stream` of data items.
    pub fn into_stream(self) -> impl Stream<Item = Result<M::Response>> {
        futures_util::stream::unfold(self, |mut h| async move {
            h.next().await.map(|item| (item, h))
        })
    }
}

impl<M: Bidi> StreamHandle<M> {
    /// Write one further frame (bidirectional methods only).
    pub async fn send(&self, frame: &M::Frame) -> Result<()> {
        let bytes = codec::encode_message(frame)?;
        self.raw.write(bytes).await
    }
}
