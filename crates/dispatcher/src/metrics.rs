//! Dispatcher metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::WriteReport;

/// Counters for one dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Batches dispatched
    batch_count: AtomicU64,
    /// Points written by any sink
    written_count: AtomicU64,
    /// Points a sink could not store
    skipped_count: AtomicU64,
    /// Points whose individual write failed
    failure_count: AtomicU64,
    /// Batches rerouted to the console
    fallback_count: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch_count(&self) -> u64 {
        self.batch_count.load(Ordering::Relaxed)
    }

    pub fn inc_batch_count(&self) {
        self.batch_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn written_count(&self) -> u64 {
        self.written_count.load(Ordering::Relaxed)
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped_count.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn fallback_count(&self) -> u64 {
        self.fallback_count.load(Ordering::Relaxed)
    }

    pub fn inc_fallback_count(&self) {
        self.fallback_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Fold a sink's write report into the counters
    pub fn record_report(&self, report: &WriteReport) {
        self.written_count
            .fetch_add(report.written as u64, Ordering::Relaxed);
        self.skipped_count
            .fetch_add(report.skipped as u64, Ordering::Relaxed);
        self.failure_count
            .fetch_add(report.failed as u64, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batch_count: self.batch_count(),
            written_count: self.written_count(),
            skipped_count: self.skipped_count(),
            failure_count: self.failure_count(),
            fallback_count: self.fallback_count(),
        }
    }
}

/// Snapshot of dispatcher metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub batch_count: u64,
    pub written_count: u64,
    pub skipped_count: u64,
    pub failure_count: u64,
    pub fallback_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_report() {
        let metrics = DispatchMetrics::new();
        metrics.inc_batch_count();
        metrics.record_report(&WriteReport {
            written: 3,
            skipped: 1,
            failed: 2,
        });
        metrics.inc_fallback_count();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                batch_count: 1,
                written_count: 3,
                skipped_count: 1,
                failure_count: 2,
                fallback_count: 1,
            }
        );
    }
}
