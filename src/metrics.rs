use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Request-level counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub nodes_created: Arc<AtomicU64>,
    pub nodes_updated: Arc<AtomicU64>,
    pub nodes_deleted: Arc<AtomicU64>,
    pub mutations_rejected: Arc<AtomicU64>,
    pub tree_reads: Arc<AtomicU64>,
    pub book_writes: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            nodes_created: Arc::new(AtomicU64::new(0)),
            nodes_updated: Arc::new(AtomicU64::new(0)),
            nodes_deleted: Arc::new(AtomicU64::new(0)),
            mutations_rejected: Arc::new(AtomicU64::new(0)),
            tree_reads: Arc::new(AtomicU64::new(0)),
            book_writes: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_nodes_created(&self) {
        self.nodes_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_nodes_updated(&self) {
        self.nodes_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_nodes_deleted(&self) {
        self.nodes_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_mutations_rejected(&self) {
        self.mutations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_tree_reads(&self) {
        self.tree_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_book_writes(&self) {
        self.book_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            nodes_created: self.nodes_created.load(Ordering::Relaxed),
            nodes_updated: self.nodes_updated.load(Ordering::Relaxed),
            nodes_deleted: self.nodes_deleted.load(Ordering::Relaxed),
            mutations_rejected: self.mutations_rejected.load(Ordering::Relaxed),
            tree_reads: self.tree_reads.load(Ordering::Relaxed),
            book_writes: self.book_writes.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub nodes_created: u64,
    pub nodes_updated: u64,
    pub nodes_deleted: u64,
    pub mutations_rejected: u64,
    pub tree_reads: u64,
    pub book_writes: u64,
    pub uptime_seconds: u64,
}
