//! Observability metrics for the template cache.
//!
//! Counters are only touched on cold paths (node creation, edge promotion,
//! template materialization, reset). Cache hits are not counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking template cache activity.
///
/// All metrics use relaxed atomic operations and can be read at any time.
/// Cloning yields another handle to the same counters.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    /// Trie nodes installed into an edge-set
    nodes_created: AtomicU64,
    /// Candidate nodes built but dropped after losing an install race
    candidates_discarded: AtomicU64,
    /// Edge-sets promoted from a single entry to a map
    edge_promotions: AtomicU64,
    /// Templates installed on a node
    templates_materialized: AtomicU64,
    /// Templates built but dropped after losing an install race
    templates_discarded: AtomicU64,
    /// Root resets
    resets: AtomicU64,
}

impl CacheMetrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    pub(crate) fn record_node_created(&self) {
        self.inner.nodes_created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_candidates_discarded(&self, count: usize) {
        self.inner
            .candidates_discarded
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_promotion(&self) {
        self.inner.edge_promotions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_materialized(&self) {
        self.inner
            .templates_materialized
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_template_discarded(&self) {
        self.inner
            .templates_discarded
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_reset(&self) {
        self.inner.resets.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the number of trie nodes created.
    pub fn nodes_created(&self) -> u64 {
        self.inner.nodes_created.load(Ordering::Relaxed)
    }

    /// Get the number of candidate nodes discarded after losing a race.
    pub fn candidates_discarded(&self) -> u64 {
        self.inner.candidates_discarded.load(Ordering::Relaxed)
    }

    /// Get the number of edge-set promotions.
    pub fn edge_promotions(&self) -> u64 {
        self.inner.edge_promotions.load(Ordering::Relaxed)
    }

    /// Get the number of templates materialized.
    pub fn templates_materialized(&self) -> u64 {
        self.inner.templates_materialized.load(Ordering::Relaxed)
    }

    /// Get the number of redundant templates discarded after losing a race.
    pub fn templates_discarded(&self) -> u64 {
        self.inner.templates_discarded.load(Ordering::Relaxed)
    }

    /// Get the number of resets.
    pub fn resets(&self) -> u64 {
        self.inner.resets.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            nodes_created: self.nodes_created(),
            candidates_discarded: self.candidates_discarded(),
            edge_promotions: self.edge_promotions(),
            templates_materialized: self.templates_materialized(),
            templates_discarded: self.templates_discarded(),
            resets: self.resets(),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.inner.nodes_created.store(0, Ordering::Relaxed);
        self.inner.candidates_discarded.store(0, Ordering::Relaxed);
        self.inner.edge_promotions.store(0, Ordering::Relaxed);
        self.inner.templates_materialized.store(0, Ordering::Relaxed);
        self.inner.templates_discarded.store(0, Ordering::Relaxed);
        self.inner.resets.store(0, Ordering::Relaxed);
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of cache metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheMetricsSnapshot {
    pub nodes_created: u64,
    pub candidates_discarded: u64,
    pub edge_promotions: u64,
    pub templates_materialized: u64,
    pub templates_discarded: u64,
    pub resets: u64,
}

impl CacheMetricsSnapshot {
    /// Fraction of node construction work that was thrown away (0.0 to 1.0).
    ///
    /// Returns 0.0 if no nodes have been built.
    pub fn wasted_node_rate(&self) -> f64 {
        let total = self.nodes_created.saturating_add(self.candidates_discarded);
        if total == 0 {
            0.0
        } else {
            self.candidates_discarded as f64 / total as f64
        }
    }
}
