//! Minimal metrics registry for the bridge.
//!
//! No metrics crate is pulled in; this module provides counter/gauge/histogram
//! types with dynamic labels backed by `DashMap`. Labels are flattened into
//! sorted key vectors to keep deterministic ordering. Histogram buckets are
//! fixed in milliseconds since node calls range from sub-ms to tens of seconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &[(String, String)]) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Current value for an exact label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum across all label sets.
    pub fn total(&self) -> u64 {
        self.map.iter().map(|r| r.value().load(Ordering::Relaxed)).sum()
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(r.key()), val);
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<Vec<(String, String)>, AtomicI64>,
}

impl GaugeVec {
    pub fn inc(&self, labels: &[(&str, &str)]) { self.add(labels, 1); }
    pub fn dec(&self, labels: &[(&str, &str)]) { self.add(labels, -1); }

    fn add(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self.map.entry(label_key(labels)).or_insert_with(|| AtomicI64::new(0));
        gauge.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> i64 {
        self.map
            .get(&label_key(labels))
            .map(|g| g.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} gauge", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(r.key()), val);
        }
    }
}

// Fixed buckets in milliseconds: 1ms .. 60s
const BUCKETS_MILLIS: [u64; 8] = [1, 5, 25, 100, 500, 2_500, 10_000, 60_000];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 8],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<Vec<(String, String)>, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration and increment cumulative buckets (millisecond scale).
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self.map.entry(label_key(labels)).or_default();
        let millis = duration.as_millis() as u64;

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(millis, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MILLIS.iter().enumerate() {
            if millis <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} histogram", name);
        for r in self.map.iter() {
            let hist = r.value();
            let labels = label_str(r.key());
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (i, &le) in BUCKETS_MILLIS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);

            let sum = hist.sum.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_sum{{{}}} {}", name, labels, sum);
            let _ = writeln!(out, "{}_count{{{}}} {}", name, labels, count);
        }
    }
}

#[derive(Default)]
pub struct BridgeMetrics {
    /// labels: method, outcome
    pub unary_calls: CounterVec,
    /// labels: method
    pub unary_duration: HistogramVec,
    /// labels: method
    pub streams_opened: CounterVec,
    /// labels: method
    pub streams_active: GaugeVec,
    /// labels: method, cause (end|error|cancel|drop|feed_closed)
    pub stream_teardowns: CounterVec,
    /// labels: kind
    pub dropped_events: CounterVec,
    /// labels: step (attempt|reset|edge_refresh|mark_edges_live|side_effect_failed)
    pub payment_steps: CounterVec,
    /// labels: outcome (succeeded or the failure reason)
    pub payment_results: CounterVec,
}

impl BridgeMetrics {
    /// Render all metrics in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.unary_calls.render("lnbridge_unary_calls_total", &mut out);
        self.unary_duration.render("lnbridge_unary_duration_millis", &mut out);
        self.streams_opened.render("lnbridge_streams_opened_total", &mut out);
        self.streams_active.render("lnbridge_streams_active", &mut out);
        self.stream_teardowns.render("lnbridge_stream_teardowns_total", &mut out);
        self.dropped_events.render("lnbridge_dropped_events_total", &mut out);
        self.payment_steps.render("lnbridge_payment_steps_total", &mut out);
        self.payment_results.render("lnbridge_payment_results_total", &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_keyed_by_sorted_labels() {
        let m = BridgeMetrics::default();
        m.stream_teardowns.inc(&[("method", "SubscribeState"), ("cause", "end")]);
        m.stream_teardowns.inc(&[("cause", "end"), ("method", "SubscribeState")]);

        assert_eq!(m.stream_teardowns.get(&[("method", "SubscribeState"), ("cause", "end")]), 2);
        assert_eq!(m.stream_teardowns.total(), 2);

        let text = m.render();
        assert!(text.contains("lnbridge_stream_teardowns_total{cause=\"end\",method=\"SubscribeState\"} 2"));
    }

    #[test]
    fn histogram_buckets_are_cumulative() {
        let h = HistogramVec::default();
        h.observe(&[("method", "GetInfo")], Duration::from_millis(20));
        assert_eq!(h.count(&[("method", "GetInfo")]), 1);

        let mut out = String::new();
        h.render("d", &mut out);
        assert!(out.contains("d_bucket{method=\"GetInfo\",le=\"5\"} 0"));
        assert!(out.contains("d_bucket{method=\"GetInfo\",le=\"25\"} 1"));
        assert!(out.contains("d_bucket{method=\"GetInfo\",le=\"60000\"} 1"));
    }

    #[test]
    fn gauge_tracks_active_streams() {
        let m = BridgeMetrics::default();
        m.streams_active.inc(&[("method", "SubscribeInvoices")]);
        m.streams_active.inc(&[("method", "SubscribeInvoices")]);
        m.streams_active.dec(&[("method", "SubscribeInvoices")]);
        assert_eq!(m.streams_active.get(&[("method", "SubscribeInvoices")]), 1);
    }
}
