//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for entry-to-sink handoffs.
///
/// `delivered` and `dropped` count per sink, per entry: one entry fanned
/// out to three sinks records three deliveries.
///
/// # Example
///
/// ```
/// use fanlog::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
/// metrics.record_delivered();
/// metrics.record_dropped();
/// assert_eq!(metrics.delivered_count(), 1);
/// assert_eq!(metrics.dropped_count(), 1);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    delivered: AtomicU64,
    dropped: AtomicU64,
}

impl DispatchMetrics {
    pub const fn new() -> Self {
        Self {
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Number of entries a sink failed to persist (disk full, encode
    /// failure). Eviction and level filtering are not drops.
    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    /// Drop rate as a percentage (0.0 - 100.0). Returns 0.0 before any
    /// handoff happened.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.delivered_count() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.delivered.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatchMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            delivered: AtomicU64::new(self.delivered_count()),
            dropped: AtomicU64::new(self.dropped_count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.delivered_count(), 0);
        assert_eq!(metrics.dropped_count(), 0);
        assert_eq!(metrics.drop_rate(), 0.0);
    }

    #[test]
    fn test_drop_rate() {
        let metrics = DispatchMetrics::new();
        for _ in 0..90 {
            metrics.record_delivered();
        }
        for _ in 0..10 {
            metrics.record_dropped();
        }
        let rate = metrics.drop_rate();
        assert!((9.9..=10.1).contains(&rate), "drop rate was {}", rate);
    }

    #[test]
    fn test_reset() {
        let metrics = DispatchMetrics::new();
        metrics.record_delivered();
        metrics.record_dropped();
        metrics.reset();
        assert_eq!(metrics.delivered_count(), 0);
        assert_eq!(metrics.dropped_count(), 0);
    }

    #[test]
    fn test_clone_is_snapshot() {
        let metrics = DispatchMetrics::new();
        metrics.record_delivered();

        let snapshot = metrics.clone();
        metrics.record_delivered();

        assert_eq!(metrics.delivered_count(), 2);
        assert_eq!(snapshot.delivered_count(), 1);
    }
}
