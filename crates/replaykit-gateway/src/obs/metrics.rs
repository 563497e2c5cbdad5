//! Minimal metrics registry for the conversion gateway.
//!
//! Counter/gauge/histogram types with dynamic labels backed by `DashMap`.
//! Label sets are sorted before lookup so the same labels always hit the
//! same series. Histogram buckets are fixed in microseconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

type LabelKey = Vec<(String, String)>;

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
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
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        for r in self.map.iter() {
            let value = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}{{{}}} {value}", label_str(r.key()));
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn dec(&self, labels: &[(&str, &str)]) {
        self.add(labels, -1);
    }

    fn add(&self, labels: &[(&str, &str)], v: i64) {
        self.map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0))
            .fetch_add(v, Ordering::Relaxed);
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} gauge");
        for r in self.map.iter() {
            let value = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}{{{}}} {value}", label_str(r.key()));
        }
    }
}

// 50us .. 100ms; rendering is CPU-only so the tail is short.
const BUCKETS_MICROS: [u64; 8] = [50, 100, 250, 500, 1_000, 5_000, 20_000, 100_000];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; BUCKETS_MICROS.len()],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration (microsecond scale, cumulative buckets).
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self.map.entry(label_key(labels)).or_default();
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(micros, Ordering::Relaxed);
        for (bucket, &le) in hist.buckets.iter().zip(BUCKETS_MICROS.iter()) {
            if micros <= le {
                bucket.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} histogram");
        for r in self.map.iter() {
            let labels = label_str(r.key());
            let prefix = if labels.is_empty() { String::new() } else { format!("{labels},") };
            let hist = r.value();

            for (bucket, le) in hist.buckets.iter().zip(BUCKETS_MICROS) {
                let n = bucket.load(Ordering::Relaxed);
                let _ = writeln!(out, "{name}_bucket{{{prefix}le=\"{le}\"}} {n}");
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}_bucket{{{prefix}le=\"+Inf\"}} {count}");
            let _ = writeln!(out, "{name}_sum{{{labels}}} {}", hist.sum.load(Ordering::Relaxed));
            let _ = writeln!(out, "{name}_count{{{labels}}} {count}");
        }
    }
}

#[derive(Default)]
pub struct ReplayMetrics {
    pub conversions: CounterVec,
    pub conversion_errors: CounterVec,
    pub conversions_in_flight: GaugeVec,
    pub conversion_duration: HistogramVec,
}

impl ReplayMetrics {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.conversions.render("replaykit_conversions_total", &mut out);
        self.conversion_errors.render("replaykit_conversion_errors_total", &mut out);
        self.conversions_in_flight.render("replaykit_conversions_in_flight", &mut out);
        self.conversion_duration.render("replaykit_conversion_duration_micros", &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_merge_label_order() {
        let m = ReplayMetrics::default();
        m.conversions.inc(&[("kind", "raw_socket"), ("outcome", "ok")]);
        m.conversions.inc(&[("outcome", "ok"), ("kind", "raw_socket")]);
        assert!(m
            .render()
            .contains("replaykit_conversions_total{kind=\"raw_socket\",outcome=\"ok\"} 2"));
    }

    #[test]
    fn histogram_buckets_are_cumulative() {
        let m = ReplayMetrics::default();
        m.conversion_duration.observe(&[("kind", "flow_requests")], Duration::from_micros(700));
        let out = m.render();
        let name = "replaykit_conversion_duration_micros";
        let bucket = |le: &str| format!("{name}_bucket{{kind=\"flow_requests\",le=\"{le}\"}}");
        assert!(out.contains(&format!("{} 0", bucket("500"))));
        assert!(out.contains(&format!("{} 1", bucket("1000"))));
        assert!(out.contains(&format!("{} 1", bucket("+Inf"))));
        assert!(out.contains(&format!("{name}_count{{kind=\"flow_requests\"}} 1")));
    }

    #[test]
    fn gauge_goes_up_and_down() {
        let m = ReplayMetrics::default();
        m.conversions_in_flight.inc(&[("kind", "single_request")]);
        m.conversions_in_flight.dec(&[("kind", "single_request")]);
        assert!(m.render().contains("replaykit_conversions_in_flight{kind=\"single_request\"} 0"));
    }

    #[test]
    fn label_values_are_escaped() {
        assert_eq!(escape_label("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
    }
}
