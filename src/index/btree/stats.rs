//! Index statistics tracking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by an index while it inserts.
///
/// Counters are atomics so they can be read and reset through `&self`.
/// Ordering is `Relaxed` throughout: counters are independent and only
/// need atomicity.
///
/// # Example
/// ```
/// use ixtree::index::btree::IndexStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = IndexStats::new();
/// stats.leaf_splits.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.snapshot().leaf_splits, 1);
/// ```
#[derive(Debug)]
pub struct IndexStats {
    /// Entries accepted by `insert`.
    pub inserts: AtomicU64,

    /// Splits of nodes holding entries.
    pub leaf_splits: AtomicU64,

    /// Splits of nodes holding child references.
    pub internal_splits: AtomicU64,

    /// New roots created above a split root.
    pub root_promotions: AtomicU64,

    /// Split siblings nobody linked into the tree.
    pub discarded_siblings: AtomicU64,

    /// Entries that overflowed a full leaf and were not stored.
    pub dropped_entries: AtomicU64,
}

impl IndexStats {
    pub fn new() -> Self {
        Self {
            inserts: AtomicU64::new(0),
            leaf_splits: AtomicU64::new(0),
            internal_splits: AtomicU64::new(0),
            root_promotions: AtomicU64::new(0),
            discarded_siblings: AtomicU64::new(0),
            dropped_entries: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a non-atomic copy for display/logging.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            leaf_splits: self.leaf_splits.load(Ordering::Relaxed),
            internal_splits: self.internal_splits.load(Ordering::Relaxed),
            root_promotions: self.root_promotions.load(Ordering::Relaxed),
            discarded_siblings: self.discarded_siblings.load(Ordering::Relaxed),
            dropped_entries: self.dropped_entries.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.inserts.store(0, Ordering::Relaxed);
        self.leaf_splits.store(0, Ordering::Relaxed);
        self.internal_splits.store(0, Ordering::Relaxed);
        self.root_promotions.store(0, Ordering::Relaxed);
        self.discarded_siblings.store(0, Ordering::Relaxed);
        self.dropped_entries.store(0, Ordering::Relaxed);
    }
}

impl Default for IndexStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time copy of [`IndexStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub inserts: u64,
    pub leaf_splits: u64,
    pub internal_splits: u64,
    pub root_promotions: u64,
    pub discarded_siblings: u64,
    pub dropped_entries: u64,
}

impl StatsSnapshot {
    /// Total splits of either kind.
    pub fn splits(&self) -> u64 {
        self.leaf_splits + self.internal_splits
    }

    /// True when some accepted insert did not end up reachable from the root.
    pub fn lost_data(&self) -> bool {
        self.discarded_siblings > 0 || self.dropped_entries > 0
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ inserts: {}, splits: {} (leaf {}, internal {}), promotions: {}, discarded: {}, dropped: {} }}",
            self.inserts,
            self.splits(),
            self.leaf_splits,
            self.internal_splits,
            self.root_promotions,
            self.discarded_siblings,
            self.dropped_entries
        )
    }
}
