use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for graph operations.
///
/// Counters use relaxed atomics so that read-only queries, which may run
/// concurrently from several threads, can still record index activity.
#[derive(Debug, Default)]
pub struct StorageMetrics {
    nodes_created: AtomicU64,
    nodes_deleted: AtomicU64,
    edges_created: AtomicU64,
    edges_deleted: AtomicU64,
    diffs_appended: AtomicU64,
    rollbacks_applied: AtomicU64,
    index_hits: AtomicU64,
    index_misses: AtomicU64,
    adjacency_scans: AtomicU64,
}

impl StorageMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_node_created(&self) {
        self.nodes_created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_node_deleted(&self) {
        self.nodes_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_edge_created(&self) {
        self.edges_created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_edge_deleted(&self) {
        self.edges_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_diff_appended(&self) {
        self.diffs_appended.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rollback(&self) {
        self.rollbacks_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_index_hit(&self) {
        self.index_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_index_miss(&self) {
        self.index_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_adjacency_scan(&self) {
        self.adjacency_scans.fetch_add(1, Ordering::Relaxed);
    }

    /// Consistent point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            nodes_created: self.nodes_created.load(Ordering::Relaxed),
            nodes_deleted: self.nodes_deleted.load(Ordering::Relaxed),
            edges_created: self.edges_created.load(Ordering::Relaxed),
            edges_deleted: self.edges_deleted.load(Ordering::Relaxed),
            diffs_appended: self.diffs_appended.load(Ordering::Relaxed),
            rollbacks_applied: self.rollbacks_applied.load(Ordering::Relaxed),
            index_hits: self.index_hits.load(Ordering::Relaxed),
            index_misses: self.index_misses.load(Ordering::Relaxed),
            adjacency_scans: self.adjacency_scans.load(Ordering::Relaxed),
        }
    }
}

/// Plain-value view of [`StorageMetrics`] for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub nodes_created: u64,
    pub nodes_deleted: u64,
    pub edges_created: u64,
    pub edges_deleted: u64,
    pub diffs_appended: u64,
    pub rollbacks_applied: u64,
    pub index_hits: u64,
    pub index_misses: u64,
    pub adjacency_scans: u64,
}

impl MetricsSnapshot {
    pub fn index_hit_rate(&self) -> f64 {
        let total = self.index_hits + self.index_misses;
        if total == 0 {
            0.0
        } else {
            self.index_hits as f64 / total as f64
        }
    }
}
