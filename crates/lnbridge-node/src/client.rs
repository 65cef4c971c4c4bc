//! Command facade over the bridge.
//!
//! `LndClient` is cheap to clone and owns the wiring: config, transport,
//! multiplexer and metrics. The per-method wrappers live in `commands/`; this
//! file holds the three generic primitives they are built on.

use std::sync::Arc;

use tokio::time::Instant;

use lnbridge_core::error::Result;
use lnbridge_core::protocol::codec;
use lnbridge_core::rpc::{Streaming, Unary};

use crate::config::ClientConfig;
use crate::mux::{Multiplexer, StreamHandle};
use crate::obs::BridgeMetrics;
use crate::transport::BridgeTransport;

#[derive(Clone)]
pub struct LndClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    cfg: ClientConfig,
    transport: Arc<dyn BridgeTransport>,
    mux: Arc<Multiplexer>,
    metrics: Arc<BridgeMetrics>,
}

impl LndClient {
    /// Build the client and start routing the transport's event feed.
    /// Must be called inside a tokio runtime.
    pub fn new(cfg: ClientConfig, transport: Arc<dyn BridgeTransport>) -> Result<Self> {
        cfg.validate()?;

        let metrics = Arc::new(BridgeMetrics::default());
        let mux = Multiplexer::start(Arc::clone(&transport), Arc::clone(&metrics))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                cfg,
                transport,
                mux,
                metrics,
            }),
        })
    }

    pub fn cfg(&self) -> &ClientConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> Arc<BridgeMetrics> {
        Arc::clone(&self.inner.metrics)
    }

    pub fn multiplexer(&self) -> Arc<Multiplexer> {
        Arc::clone(&self.inner.mux)
    }

    /// One-shot call: encode, `call`, decode.
    pub async fn unary<M: Unary>(&self, request: &M::Request) -> Result<M::Response> {
        let env = codec::encode::<M>(request)?;
        let started = Instant::now();
        tracing::debug!(method = M::NAME, "request");

        let res = match self.inner.transport.call(&env.method, env.payload).await {
            Ok(reply) => codec::decode::<M::Response>(reply),
            Err(e) => Err(e),
        };

        let elapsed = started.elapsed();
        self.inner
            .metrics
            .unary_duration
            .observe(&[("method", M::NAME)], elapsed);

        match &res {
            Ok(_) => {
                self.inner.metrics.unary_calls.inc(&[("method", M::NAME), ("outcome", "ok")]);
                tracing::debug!(method = M::NAME, elapsed_ms = elapsed.as_millis() as u64, "response");
            }
            Err(e) => {
                self.inner
                    .metrics
                    .unary_calls
                    .inc(&[("method", M::NAME), ("outcome", e.code().as_str())]);
                tracing::debug!(method = M::NAME, elapsed_ms = elapsed.as_millis() as u64, error = %e, "response error");
            }
        }
        res
    }

    /// Open a streaming call and hand back its handle.
    pub async fn stream<M: Streaming>(&self, request: &M::Request) -> Result<StreamHandle<M>> {
        let env = codec::encode::<M>(request)?;
        let raw = self.inner.mux.begin_stream(&env.method, env.payload).await?;
        Ok(StreamHandle::new(raw))
    }

    /// Open a streaming call and drive it to completion.
    ///
    /// `on_data` runs for every `data` event. Resolves with the `end` payload
    /// (if the node sent one), rejects on a node `error` or an undecodable
    /// event. Dropping the returned future tears the stream down; use
    /// [`LndClient::stream`] + [`StreamHandle::run`] to keep a cancel handle.
    pub async fn consume<M, F>(&self, request: &M::Request, on_data: F) -> Result<Option<M::Response>>
    where
        M: Streaming,
        F: FnMut(M::Response),
    {
        self.stream::<M>(request).await?.run(on_data).await
    }
}
