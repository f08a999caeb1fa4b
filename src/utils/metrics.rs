//! Observability and Metrics
//!
//! Counters for the framing layer: frames packed and unpacked, bytes moved,
//! how many frames went through zlib, and how many were rejected.
//!
//! Uses atomic counters for thread-safe metrics collection.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Metrics collector for framing operations
#[derive(Debug)]
pub struct Metrics {
    /// Frames written by `pack`
    pub packets_packed: AtomicU64,
    /// Frames read by `unpack`
    pub packets_unpacked: AtomicU64,
    /// Bytes written to streams, length prefixes included
    pub bytes_written: AtomicU64,
    /// Bytes read from streams, length prefixes included
    pub bytes_read: AtomicU64,
    /// Frames written with a zlib body
    pub compressed_packed: AtomicU64,
    /// Frames read with a zlib body
    pub compressed_unpacked: AtomicU64,
    /// Frames rejected for breaking framing invariants
    pub framing_errors: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            packets_packed: AtomicU64::new(0),
            packets_unpacked: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            bytes_read: AtomicU64::new(0),
            compressed_packed: AtomicU64::new(0),
            compressed_unpacked: AtomicU64::new(0),
            framing_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a frame written
    pub fn packet_packed(&self, byte_count: u64, compressed: bool) {
        self.packets_packed.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(byte_count, Ordering::Relaxed);
        if compressed {
            self.compressed_packed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a frame read
    pub fn packet_unpacked(&self, byte_count: u64, compressed: bool) {
        self.packets_unpacked.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(byte_count, Ordering::Relaxed);
        if compressed {
            self.compressed_unpacked.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a frame rejected by the framing layer
    pub fn framing_error(&self) {
        self.framing_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            packets_packed: self.packets_packed.load(Ordering::Relaxed),
            packets_unpacked: self.packets_unpacked.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            compressed_packed: self.compressed_packed.load(Ordering::Relaxed),
            compressed_unpacked: self.compressed_unpacked.load(Ordering::Relaxed),
            framing_errors: self.framing_errors.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            packets_packed = snapshot.packets_packed,
            packets_unpacked = snapshot.packets_unpacked,
            bytes_written = snapshot.bytes_written,
            bytes_read = snapshot.bytes_read,
            compressed_packed = snapshot.compressed_packed,
            compressed_unpacked = snapshot.compressed_unpacked,
            framing_errors = snapshot.framing_errors,
            uptime_seconds = snapshot.uptime_seconds,
            "Codec metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub packets_packed: u64,
    pub packets_unpacked: u64,
    pub bytes_written: u64,
    pub bytes_read: u64,
    pub compressed_packed: u64,
    pub compressed_unpacked: u64,
    pub framing_errors: u64,
    pub uptime_seconds: u64,
}

static METRICS: Lazy<Metrics> = Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}
