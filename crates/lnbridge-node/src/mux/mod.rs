//! Correlation multiplexer.
//!
//! Every stream call gets a fresh id and a route in [`StreamRegistry`]. One
//! pump task drains the transport's shared event feed and forwards each event
//! to the route registered under its id; events with no route are dropped.
//!
//! Teardown (unregister + `closeStream`) is owned by whichever party removes
//! the route first: the pump on a terminal event, or the handle on cancel or
//! drop. The loser finds nothing to remove and does nothing. The pump never
//! waits on `closeStream`; it forwards the terminal event and spawns the close.

pub mod handle;
pub mod registry;

use std::sync::Arc;

use bytes::Bytes;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use lnbridge_core::error::{BridgeError, Result};
use lnbridge_core::protocol::{EventKind, StreamEvent, StreamId};

use crate::obs::BridgeMetrics;
use crate::transport::{BridgeTransport, EventFeed};

pub use handle::{CancelHandle, RawStream, StreamHandle};
pub use registry::StreamRegistry;

use registry::Routed;

/// Why a stream was torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    End,
    Error,
    Cancel,
    Drop,
    FeedClosed,
}

impl Teardown {
    pub fn as_str(self) -> &'static str {
        match self {
            Teardown::End => "end",
            Teardown::Error => "error",
            Teardown::Cancel => "cancel",
            Teardown::Drop => "drop",
            Teardown::FeedClosed => "feed_closed",
        }
    }
}

pub struct Multiplexer {
    transport: Arc<dyn BridgeTransport>,
    registry: Arc<StreamRegistry>,
    metrics: Arc<BridgeMetrics>,
    rt: Handle,
    pump: JoinHandle<()>,
}

impl Multiplexer {
    /// Take the transport's event feed and start routing it.
    ///
    /// Must be called inside a tokio runtime; that runtime also runs every
    /// later teardown, whichever thread drops the handle.
    pub fn start(transport: Arc<dyn BridgeTransport>, metrics: Arc<BridgeMetrics>) -> Result<Arc<Self>> {
        let rt = Handle::try_current()
            .map_err(|_| BridgeError::Internal("multiplexer started outside a tokio runtime".into()))?;
        let feed = transport.events()?;
        let registry = Arc::new(StreamRegistry::new());

        let pump = rt.spawn(pump(
            feed,
            Arc::clone(&registry),
            Arc::clone(&transport),
            Arc::clone(&metrics),
            rt.clone(),
        ));

        Ok(Arc::new(Self {
            transport,
            registry,
            metrics,
            rt,
            pump,
        }))
    }

    /// Id not held by any outstanding stream at the time of the call.
    ///
    /// The id is not reserved: a concurrent `begin_stream` may claim it
    /// first. Only `begin_stream` allocates and registers in one step.
    pub fn generate_id(&self) -> StreamId {
        self.registry.generate_id()
    }

    /// Register a route, then open the stream on the transport.
    ///
    /// The route exists before `openStream` so events that race the open
    /// reply are not lost.
    pub async fn begin_stream(self: &Arc<Self>, method: &str, request: Bytes) -> Result<RawStream> {
        let method: Arc<str> = Arc::from(method);
        let (id, rx) = self.registry.register(Arc::clone(&method));
        self.metrics.streams_active.inc(&[("method", &*method)]);

        if let Err(e) = self.transport.open_stream(&method, &id, request).await {
            // A terminal event may have raced the failed open and released it.
            if self.registry.remove(&id).is_some() {
                self.metrics.streams_active.dec(&[("method", &*method)]);
            }
            tracing::warn!(%method, stream_id = %id, error = %e, "stream open failed");
            return Err(e);
        }

        self.metrics.streams_opened.inc(&[("method", &*method)]);
        tracing::debug!(%method, stream_id = %id, "stream opened");

        Ok(RawStream::new(id, method, rx, Arc::clone(self)))
    }

    /// Number of streams still registered.
    pub fn outstanding(&self) -> usize {
        self.registry.len()
    }

    pub fn is_outstanding(&self, stream_id: &StreamId) -> bool {
        self.registry.is_registered(stream_id)
    }

    pub(crate) async fn write(&self, stream_id: &StreamId, frame: Bytes) -> Result<()> {
        self.transport.write_stream(stream_id, frame).await
    }

    /// Unregister and close. Returns false if someone else already did.
    pub(crate) async fn release(&self, stream_id: &StreamId, cause: Teardown) -> bool {
        let Some(route) = self.registry.remove(stream_id) else {
            return false;
        };
        teardown(&*self.transport, &self.metrics, stream_id, &route.method, cause).await;
        true
    }

    /// `release` for contexts that cannot await (handle drop). Safe from any
    /// thread: the close runs on the runtime captured at `start`.
    pub(crate) fn release_detached(&self, stream_id: &StreamId, cause: Teardown) {
        let Some(route) = self.registry.remove(stream_id) else {
            return;
        };
        spawn_teardown(
            &self.rt,
            Arc::clone(&self.transport),
            Arc::clone(&self.metrics),
            stream_id.clone(),
            route.method,
            cause,
        );
    }
}

impl Drop for Multiplexer {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

fn spawn_teardown(
    rt: &Handle,
    transport: Arc<dyn BridgeTransport>,
    metrics: Arc<BridgeMetrics>,
    stream_id: StreamId,
    method: Arc<str>,
    cause: Teardown,
) {
    rt.spawn(async move {
        teardown(&*transport, &metrics, &stream_id, &method, cause).await;
    });
}

async fn teardown(
    transport: &dyn BridgeTransport,
    metrics: &BridgeMetrics,
    stream_id: &StreamId,
    method: &str,
    cause: Teardown,
) {
    if let Err(e) = transport.close_stream(stream_id).await {
        tracing::warn!(%method, %stream_id, error = %e, "closeStream failed");
    }
    metrics.streams_active.dec(&[("method", method)]);
    metrics
        .stream_teardowns
        .inc(&[("method", method), ("cause", cause.as_str())]);
    tracing::debug!(%method, %stream_id, cause = cause.as_str(), "stream released");
}

async fn pump(
    mut feed: EventFeed,
    registry: Arc<StreamRegistry>,
    transport: Arc<dyn BridgeTransport>,
    metrics: Arc<BridgeMetrics>,
    rt: Handle,
) {
    while let Some(ev) = feed.recv().await {
        match registry.route(ev) {
            Routed::Delivered => {}
            Routed::Dropped(ev) => {
                metrics.dropped_events.inc(&[("kind", ev.kind.as_str())]);
                tracing::trace!(stream_id = %ev.stream_id, kind = ev.kind.as_str(), "dropping uncorrelated event");
            }
            Routed::Terminal(route, ev) => {
                let cause = match ev.kind {
                    EventKind::Error => Teardown::Error,
                    _ => Teardown::End,
                };
                let stream_id = ev.stream_id.clone();
                let _ = route.tx.send(ev);
                spawn_teardown(&rt, Arc::clone(&transport), Arc::clone(&metrics), stream_id, route.method, cause);
            }
        }
    }

    // Nothing can terminate the remaining streams any more; fail them.
    for (stream_id, route) in registry.drain() {
        let _ = route.tx.send(StreamEvent::error(stream_id.clone(), "bridge event feed closed"));
        teardown(&*transport, &metrics, &stream_id, &route.method, Teardown::FeedClosed).await;
    }
    tracing::debug!("event feed closed; pump exiting");
}
