//! Scripted in-memory native module for integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;

use lnbridge_core::protocol::codec;
use lnbridge_node::config::ClientConfig;
use lnbridge_node::transport::{BridgeTransport, EventSink, NativeBridge, NativeTransport};
use lnbridge_node::LndClient;

/// base64 text of an encoded message, as the native module would send it.
pub fn b64<T: Serialize>(v: &T) -> String {
    codec::to_text(&codec::encode_message(v).unwrap())
}

/// One event the mock emits on a stream right after it is opened.
#[derive(Debug, Clone)]
pub enum Step {
    Data(String),
    Status(String),
    Error(String),
    End(Option<String>),
}

impl Step {
    pub fn data<T: Serialize>(v: &T) -> Self {
        Step::Data(b64(v))
    }

    pub fn to_json(&self, stream_id: &str) -> String {
        let v = match self {
            Step::Data(d) => json!({ "streamId": stream_id, "type": "data", "data": d }),
            Step::Status(s) => json!({ "streamId": stream_id, "type": "status", "data": s }),
            Step::Error(e) => json!({ "streamId": stream_id, "type": "error", "error": e }),
            Step::End(Some(d)) => json!({ "streamId": stream_id, "type": "end", "data": d }),
            Step::End(None) => json!({ "streamId": stream_id, "type": "end" }),
        };
        v.to_string()
    }
}

#[derive(Default)]
pub struct MockNode {
    sink: Mutex<Option<EventSink>>,
    replies: Mutex<HashMap<String, VecDeque<Result<String, String>>>>,
    scripts: Mutex<HashMap<String, VecDeque<Vec<Step>>>>,
    fail_open: Mutex<Option<String>>,
    close_delay: Mutex<Option<Duration>>,
    pub invokes: Mutex<Vec<(String, String)>>,
    pub opens: Mutex<Vec<(String, String, String)>>,
    pub writes: Mutex<Vec<(String, String)>>,
    closes: Mutex<HashMap<String, u32>>,
}

impl MockNode {
    pub fn attach(&self, sink: EventSink) {
        *self.sink.lock().unwrap() = Some(sink);
    }

    pub fn sink(&self) -> EventSink {
        self.sink.lock().unwrap().clone().expect("sink attached")
    }

    /// Queue one reply for a unary method.
    pub fn reply<T: Serialize>(&self, method: &str, v: &T) {
        self.reply_raw(method, Ok(b64(v)));
    }

    pub fn reply_raw(&self, method: &str, reply: Result<String, String>) {
        self.replies
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Queue the events emitted by the next stream opened for `method`.
    pub fn script(&self, method: &str, steps: Vec<Step>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(steps);
    }

    pub fn fail_next_open(&self, msg: &str) {
        *self.fail_open.lock().unwrap() = Some(msg.to_string());
    }

    /// Make every later `close_stream` take `delay` before it is recorded.
    pub fn set_close_delay(&self, delay: Duration) {
        *self.close_delay.lock().unwrap() = Some(delay);
    }

    pub fn invoked(&self, method: &str) -> usize {
        self.invokes.lock().unwrap().iter().filter(|(m, _)| m == method).count()
    }

    pub fn opened(&self, method: &str) -> usize {
        self.opens.lock().unwrap().iter().filter(|(m, _, _)| m == method).count()
    }

    pub fn stream_ids(&self) -> Vec<String> {
        self.opens.lock().unwrap().iter().map(|(_, id, _)| id.clone()).collect()
    }

    pub fn close_count(&self, stream_id: &str) -> u32 {
        self.closes.lock().unwrap().get(stream_id).copied().unwrap_or(0)
    }

    pub fn total_closes(&self) -> u32 {
        self.closes.lock().unwrap().values().sum()
    }

    /// Push a raw notification onto the shared feed.
    pub async fn emit(&self, stream_id: &str, step: Step) {
        self.sink().deliver_json(&step.to_json(stream_id)).await.unwrap();
    }
}

#[async_trait]
impl NativeBridge for MockNode {
    async fn invoke(&self, method: &str, payload: String) -> Result<String, String> {
        self.invokes.lock().unwrap().push((method.to_string(), payload));
        let next = self
            .replies
            .lock()
            .unwrap()
            .get_mut(method)
            .and_then(|q| q.pop_front());
        next.unwrap_or_else(|| Err(format!("no reply scripted for {method}")))
    }

    async fn open_stream(&self, method: &str, stream_id: &str, payload: String) -> Result<(), String> {
        if let Some(msg) = self.fail_open.lock().unwrap().take() {
            return Err(msg);
        }
        self.opens
            .lock()
            .unwrap()
            .push((method.to_string(), stream_id.to_string(), payload));

        let steps = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(method)
            .and_then(|q| q.pop_front())
            .unwrap_or_default();
        for step in steps {
            self.emit(stream_id, step).await;
        }
        Ok(())
    }

    async fn write_stream(&self, stream_id: &str, payload: String) -> Result<(), String> {
        self.writes.lock().unwrap().push((stream_id.to_string(), payload));
        Ok(())
    }

    async fn close_stream(&self, stream_id: &str) -> Result<(), String> {
        let delay = *self.close_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        *self.closes.lock().unwrap().entry(stream_id.to_string()).or_default() += 1;
        Ok(())
    }
}

pub struct Harness {
    pub node: Arc<MockNode>,
    pub transport: Arc<NativeTransport>,
    pub client: LndClient,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(cfg: ClientConfig) -> Self {
        let node = Arc::new(MockNode::default());
        let transport = Arc::new(NativeTransport::new(
            Arc::clone(&node) as Arc<dyn NativeBridge>,
            cfg.bridge.event_queue_capacity,
        ));
        node.attach(transport.sink());
        let client = LndClient::new(cfg, Arc::clone(&transport) as Arc<dyn BridgeTransport>).unwrap();
        Self {
            node,
            transport,
            client,
        }
    }
}

/// Poll `cond` until it holds or a second has passed.
pub async fn eventually<F: Fn() -> bool>(cond: F) -> bool {
    for _ in 0..100 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}
