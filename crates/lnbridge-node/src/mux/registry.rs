use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::mpsc;

use lnbridge_core::protocol::{StreamEvent, StreamId};

/// Delivery side of one registered stream.
pub(crate) struct Route {
    pub(crate) method: Arc<str>,
    pub(crate) tx: mpsc::UnboundedSender<StreamEvent>,
}

/// Where the pump should send an event.
pub(crate) enum Routed {
    /// Forwarded to a live stream.
    Delivered,
    /// No stream registered under this id.
    Dropped(StreamEvent),
    /// Terminal event; the route is already unregistered and the caller owns
    /// teardown before forwarding.
    Terminal(Route, StreamEvent),
}

/// Stream registry:
/// - `stream_id -> Route` for every outstanding stream
///
/// Registration and removal are the only mutations. Whoever removes a route
/// owns the `closeStream` for it, so teardown happens once per id.
pub struct StreamRegistry {
    routes: DashMap<StreamId, Route>,
    seq: AtomicU64,
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self {
            routes: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    /// Next id not held by any outstanding stream.
    pub fn generate_id(&self) -> StreamId {
        loop {
            let id = StreamId::from(self.seq.fetch_add(1, Ordering::Relaxed).to_string());
            if !self.routes.contains_key(&id) {
                return id;
            }
        }
    }

    /// Allocate an id and register its route in one step.
    pub(crate) fn register(&self, method: Arc<str>) -> (StreamId, mpsc::UnboundedReceiver<StreamEvent>) {
        loop {
            let id = self.generate_id();
            if let Entry::Vacant(slot) = self.routes.entry(id.clone()) {
                let (tx, rx) = mpsc::unbounded_channel();
                slot.insert(Route { method, tx });
                return (id, rx);
            }
        }
    }

    pub(crate) fn remove(&self, stream_id: &StreamId) -> Option<Route> {
        self.routes.remove(stream_id).map(|(_, route)| route)
    }

    pub(crate) fn route(&self, ev: StreamEvent) -> Routed {
        if ev.kind.is_terminal() {
            return match self.remove(&ev.stream_id) {
                Some(route) => Routed::Terminal(route, ev),
                None => Routed::Dropped(ev),
            };
        }

        let Some(route) = self.routes.get(&ev.stream_id) else {
            return Routed::Dropped(ev);
        };
        // A closed receiver means the handle is mid-teardown; its own removal
        // follows, so the event is simply lost.
        let _ = route.tx.send(ev);
        Routed::Delivered
    }

    /// Unregister every outstanding stream.
    pub(crate) fn drain(&self) -> Vec<(StreamId, Route)> {
        let ids: Vec<StreamId> = self.routes.iter().map(|r| r.key().clone()).collect();
        ids.into_iter()
            .filter_map(|id| self.routes.remove(&id))
            .collect()
    }

    pub fn is_registered(&self, stream_id: &StreamId) -> bool {
        self.routes.contains_key(stream_id)
    }

    /// Number of outstanding streams.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn ids_are_unique_while_outstanding() {
        let reg = StreamRegistry::new();
        let (a, _rx_a) = reg.register(Arc::from("SubscribeState"));
        let (b, _rx_b) = reg.register(Arc::from("SubscribeState"));
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn generated_id_skips_registered_ids() {
        let reg = StreamRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel::<StreamEvent>();
        reg.routes.insert(StreamId::from("1"), Route { method: Arc::from("X"), tx });
        assert_eq!(reg.generate_id().as_str(), "2");
    }

    #[test]
    fn terminal_event_unregisters_once() {
        let reg = StreamRegistry::new();
        let (id, mut rx) = reg.register(Arc::from("SubscribeInvoices"));

        assert!(matches!(reg.route(StreamEvent::data(id.clone(), Bytes::from_static(&[1]))), Routed::Delivered));
        assert!(rx.try_recv().is_ok());

        assert!(matches!(reg.route(StreamEvent::end(id.clone())), Routed::Terminal(..)));
        assert!(!reg.is_registered(&id));

        // second terminal for the same id has nobody to go to
        assert!(matches!(reg.route(StreamEvent::end(id.clone())), Routed::Dropped(_)));
        assert!(reg.remove(&id).is_none());
    }

    #[test]
    fn unknown_id_is_dropped() {
        let reg = StreamRegistry::new();
        let (_id, _rx) = reg.register(Arc::from("SubscribeInvoices"));
        assert!(matches!(
            reg.route(StreamEvent::status("nope", "IN_FLIGHT")),
            Routed::Dropped(_)
        ));
    }
}
