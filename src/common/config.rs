//! Configuration for index trees.

use crate::common::{Error, Result};

/// Default fan-out order.
///
/// A node holds at most `2 × order` children or entries, so the default
/// gives ten slots per node and eleven separator slots per internal node.
pub const DEFAULT_ORDER: usize = 5;

/// Nominal payload size class of an [`Entry`](crate::index::btree::Entry), in bytes.
///
/// This is a reserved property of the entry format. Payload lengths are not
/// checked against it.
pub const ENTRY_CAPACITY: usize = 10;

/// How insertion behaves once nodes fill up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPolicy {
    /// Append-only leaves and the minimal split protocol.
    ///
    /// Behaviour once nodes fill:
    /// - leaf entries are not sorted
    /// - the entry that overflows a leaf is dropped
    /// - a split sibling is always tagged [`NodeRole::Leaf`](crate::index::btree::NodeRole::Leaf)
    /// - a split of the root is discarded, so its upper half becomes unreachable
    ///
    /// `insert` still reports [`StatusCode::Ok`](crate::StatusCode::Ok) in all
    /// of these cases.
    #[default]
    Sketch,

    /// Full B+ tree maintenance: sorted leaves, separator upkeep,
    /// role-preserving splits and root promotion.
    Balanced,
}

/// Tree-wide parameters shared by every node of one index.
///
/// # Example
/// ```
/// use ixtree::{IndexConfig, InsertPolicy};
///
/// let config = IndexConfig::default()
///     .with_order(2)
///     .with_policy(InsertPolicy::Balanced);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.leaf_capacity(), 4);
/// assert_eq!(config.separator_capacity(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    pub order: usize,
    pub policy: InsertPolicy,
}

impl IndexConfig {
    pub fn new(order: usize, policy: InsertPolicy) -> Self {
        Self { order, policy }
    }

    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn with_policy(mut self, policy: InsertPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Check that the parameters describe a usable tree.
    ///
    /// # Errors
    /// `Error::InvalidOrder` if `order` is 0.
    pub fn validate(&self) -> Result<()> {
        if self.order == 0 {
            return Err(Error::InvalidOrder(self.order));
        }
        Ok(())
    }

    /// Maximum number of child references or entries in one node.
    #[inline]
    pub fn leaf_capacity(&self) -> usize {
        2 * self.order
    }

    /// Maximum number of separator keys in one internal node.
    #[inline]
    pub fn separator_capacity(&self) -> usize {
        2 * self.order + 1
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER, InsertPolicy::default())
    }
}
