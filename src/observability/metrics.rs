//! Metrics registry for query execution
//!
//! - Counters only (no gauges, no histograms)
//! - Monotonic increase
//! - Thread-safe but lock-minimal

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics registry containing all query counters
///
/// All counters use atomic operations for thread-safe increments.
/// Uses Relaxed ordering; exact cross-counter consistency is not needed.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Successful query count
    queries_executed: AtomicU64,
    /// Rejected query count
    queries_rejected: AtomicU64,
    /// Queries answered by identifier lookup
    fast_path_hits: AtomicU64,
    /// All-matches queries that found nothing
    no_result_queries: AtomicU64,
    /// Records evaluated against a predicate
    records_scanned: AtomicU64,
    /// Records returned to callers
    records_returned: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment queries executed
    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment queries rejected
    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment fast-path hits
    pub fn increment_fast_path_hits(&self) {
        self.fast_path_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment no-result queries
    pub fn increment_no_result_queries(&self) {
        self.no_result_queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Add to records scanned
    pub fn add_records_scanned(&self, count: u64) {
        self.records_scanned.fetch_add(count, Ordering::Relaxed);
    }

    /// Add to records returned
    pub fn add_records_returned(&self, count: u64) {
        self.records_returned.fetch_add(count, Ordering::Relaxed);
    }

    /// Get current snapshot of all metrics as JSON
    pub fn to_json(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            r#"{{"fast_path_hits":{},"no_result_queries":{},"queries_executed":{},"queries_rejected":{},"records_returned":{},"records_scanned":{}}}"#,
            snapshot.fast_path_hits,
            snapshot.no_result_queries,
            snapshot.queries_executed,
            snapshot.queries_rejected,
            snapshot.records_returned,
            snapshot.records_scanned,
        )
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            fast_path_hits: self.fast_path_hits.load(Ordering::Relaxed),
            no_result_queries: self.no_result_queries.load(Ordering::Relaxed),
            records_scanned: self.records_scanned.load(Ordering::Relaxed),
            records_returned: self.records_returned.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub queries_rejected: u64,
    pub fast_path_hits: u64,
    pub no_result_queries: u64,
    pub records_scanned: u64,
    pub records_returned: u64,
}
