//! Sink metrics for observability
//!
//! Counters describing what a sink has written and how well its encoder
//! pool is doing at avoiding allocations.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters kept per sink.
///
/// # Example
///
/// ```
/// use json_logger::SinkMetrics;
///
/// let metrics = SinkMetrics::new();
/// metrics.record_line(42);
/// metrics.record_write_error();
///
/// assert_eq!(metrics.lines_written(), 1);
/// assert_eq!(metrics.bytes_written(), 42);
/// assert_eq!(metrics.write_errors(), 1);
/// ```
#[derive(Debug)]
pub struct SinkMetrics {
    /// Log lines handed to the writer successfully
    lines_written: AtomicU64,

    /// Bytes handed to the writer successfully
    bytes_written: AtomicU64,

    /// Writes the underlying writer rejected
    write_errors: AtomicU64,

    /// Encoders created because the pool was empty
    encoders_allocated: AtomicU64,

    /// Encoders taken from the pool
    encoders_reused: AtomicU64,
}

impl SinkMetrics {
    pub const fn new() -> Self {
        Self {
            lines_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            encoders_allocated: AtomicU64::new(0),
            encoders_reused: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn lines_written(&self) -> u64 {
        self.lines_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_errors(&self) -> u64 {
        self.write_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn encoders_allocated(&self) -> u64 {
        self.encoders_allocated.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn encoders_reused(&self) -> u64 {
        self.encoders_reused.load(Ordering::Relaxed)
    }

    /// Record one successfully written line of `bytes` bytes
    #[inline]
    pub fn record_line(&self, bytes: usize) {
        self.lines_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Record a failed write, returning the previous failure count
    #[inline]
    pub fn record_write_error(&self) -> u64 {
        self.write_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_encoder_allocated(&self) -> u64 {
        self.encoders_allocated.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_encoder_reused(&self) -> u64 {
        self.encoders_reused.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of encoder borrows served from the pool, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been borrowed yet.
    pub fn reuse_rate(&self) -> f64 {
        let reused = self.encoders_reused() as f64;
        let total = reused + self.encoders_allocated() as f64;
        if total == 0.0 {
            0.0
        } else {
            (reused / total) * 100.0
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.lines_written.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.write_errors.store(0, Ordering::Relaxed);
        self.encoders_allocated.store(0, Ordering::Relaxed);
        self.encoders_reused.store(0, Ordering::Relaxed);
    }
}

impl Default for SinkMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SinkMetrics {
    /// Create a snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            lines_written: AtomicU64::new(self.lines_written()),
            bytes_written: AtomicU64::new(self.bytes_written()),
            write_errors: AtomicU64::new(self.write_errors()),
            encoders_allocated: AtomicU64::new(self.encoders_allocated()),
            encoders_reused: AtomicU64::new(self.encoders_reused()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reuse_rate() {
        let metrics = SinkMetrics::new();
        assert_eq!(metrics.reuse_rate(), 0.0);

        metrics.record_encoder_allocated();
        for _ in 0..3 {
            metrics.record_encoder_reused();
        }
        let rate = metrics.reuse_rate();
        assert!((74.9..=75.1).contains(&rate), "Reuse rate was {}", rate);
    }

    #[test]
    fn test_snapshot_and_reset() {
        let metrics = SinkMetrics::new();
        metrics.record_line(10);
        let snapshot = metrics.clone();
        metrics.reset();

        assert_eq!(snapshot.lines_written(), 1);
        assert_eq!(snapshot.bytes_written(), 10);
        assert_eq!(metrics.lines_written(), 0);
    }
}
