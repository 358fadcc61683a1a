//! Application metrics collection and reporting.

use metrics::{counter, histogram};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Metrics collector for the map server.
///
/// Every event goes both to the global `metrics` recorder (scraped from
/// `/metrics`) and to in-process counters used by tests and `/health`.
#[derive(Debug)]
pub struct MetricsCollector {
    pub tile_requests: AtomicU64,
    pub index_requests: AtomicU64,
    pub list_requests: AtomicU64,
    pub asset_requests: AtomicU64,

    pub renders_total: AtomicU64,
    pub render_errors: AtomicU64,

    render_times: RwLock<TimingStats>,

    start_time: Instant,
}

#[derive(Debug, Default)]
struct TimingStats {
    count: u64,
    total_us: u64,
    min_us: u64,
    max_us: u64,
    last_us: u64,
}

impl TimingStats {
    fn record(&mut self, duration_us: u64) {
        self.count += 1;
        self.total_us += duration_us;
        self.last_us = duration_us;
        if self.min_us == 0 || duration_us < self.min_us {
            self.min_us = duration_us;
        }
        if duration_us > self.max_us {
            self.max_us = duration_us;
        }
    }

    fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.total_us as f64 / self.count as f64) / 1000.0
        }
    }
}

/// Point-in-time copy of the collector.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub tile_requests: u64,
    pub index_requests: u64,
    pub list_requests: u64,
    pub asset_requests: u64,
    pub renders_total: u64,
    pub render_errors: u64,
    pub render_avg_ms: f64,
    pub render_min_ms: f64,
    pub render_max_ms: f64,
    pub render_last_ms: f64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            tile_requests: AtomicU64::new(0),
            index_requests: AtomicU64::new(0),
            list_requests: AtomicU64::new(0),
            asset_requests: AtomicU64::new(0),
            renders_total: AtomicU64::new(0),
            render_errors: AtomicU64::new(0),
            render_times: RwLock::new(TimingStats::default()),
            start_time: Instant::now(),
        }
    }

    pub fn record_tile_request(&self) {
        self.tile_requests.fetch_add(1, Ordering::Relaxed);
        counter!("map_tile_requests_total").increment(1);
    }

    pub fn record_index_request(&self) {
        self.index_requests.fetch_add(1, Ordering::Relaxed);
        counter!("map_index_requests_total").increment(1);
    }

    pub fn record_list_request(&self) {
        self.list_requests.fetch_add(1, Ordering::Relaxed);
        counter!("map_list_requests_total").increment(1);
    }

    pub fn record_asset_request(&self) {
        self.asset_requests.fetch_add(1, Ordering::Relaxed);
        counter!("map_asset_requests_total").increment(1);
    }

    /// Record a successful render
    pub fn record_render(&self, elapsed: Duration) {
        self.renders_total.fetch_add(1, Ordering::Relaxed);
        histogram!("map_render_duration_seconds").record(elapsed.as_secs_f64());
        if let Ok(mut times) = self.render_times.write() {
            times.record(elapsed.as_micros() as u64);
        }
    }

    /// Record a failed render, labelled by error code
    pub fn record_render_error(&self, code: &'static str) {
        self.render_errors.fetch_add(1, Ordering::Relaxed);
        counter!("map_render_errors_total", "code" => code).increment(1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let (avg, min, max, last) = match self.render_times.read() {
            Ok(t) => (
                t.avg_ms(),
                t.min_us as f64 / 1000.0,
                t.max_us as f64 / 1000.0,
                t.last_us as f64 / 1000.0,
            ),
            Err(_) => (0.0, 0.0, 0.0, 0.0),
        };
        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            tile_requests: self.tile_requests.load(Ordering::Relaxed),
            index_requests: self.index_requests.load(Ordering::Relaxed),
            list_requests: self.list_requests.load(Ordering::Relaxed),
            asset_requests: self.asset_requests.load(Ordering::Relaxed),
            renders_total: self.renders_total.load(Ordering::Relaxed),
            render_errors: self.render_errors.load(Ordering::Relaxed),
            render_avg_ms: avg,
            render_min_ms: min,
            render_max_ms: max,
            render_last_ms: last,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
