//! Index handle: the node arena and the insertion protocol.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       IndexHandle                        │
//! │  root ──▶ nodes: Vec<IndexNode>                          │
//! │           [Node0] [Node1] [Node2] ...                    │
//! │             │ children: NodeId ▼     ▲ parent: NodeId    │
//! │  config: order + InsertPolicy     stats: IndexStats      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Insertion recurses from the root. Each level either absorbs a sibling
//! produced below it or splits and hands its own sibling to the caller.
//! What happens at the top, and how leaves order their entries, depends on
//! the configured [`InsertPolicy`].

use tracing::{debug, trace, warn};

use crate::common::{Error, IndexConfig, InsertPolicy, NodeId, RecordId, Result, StatusCode};
use crate::index::btree::{
    Entry, IndexNode, IndexStats, LeafSlot, NodeRole, NodeSlots, OrderedKey, StatsSnapshot,
};

/// A node produced by a split, travelling up to be linked by its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Split {
    sibling: NodeId,
    /// Lowest key of the sibling. Only balanced insertion tracks it.
    divider: Option<OrderedKey>,
}

/// A B+ tree index over [`OrderedKey`]s.
///
/// The handle owns every node. Nodes are never freed: a sibling that is
/// split off but never linked stays in the arena, unreachable from the root.
///
/// # Usage
/// ```
/// use ixtree::{IndexConfig, IndexHandle, InsertPolicy, RecordId, StatusCode};
/// use ixtree::index::btree::{Entry, OrderedKey};
///
/// let config = IndexConfig::default().with_policy(InsertPolicy::Balanced);
/// let mut index = IndexHandle::new(config).unwrap();
///
/// for k in 0..100 {
///     let entry = Entry::keyed(OrderedKey::from_source(&k));
///     assert_eq!(index.insert(entry, RecordId::new(k, 0)), StatusCode::Ok);
/// }
///
/// assert_eq!(index.search(&OrderedKey::new(42)), vec![RecordId::new(42, 0)]);
/// ```
#[derive(Debug)]
pub struct IndexHandle {
    nodes: Vec<IndexNode>,
    root: NodeId,
    config: IndexConfig,
    stats: IndexStats,
}

impl IndexHandle {
    /// Create an index whose root is an empty node holding entries.
    ///
    /// # Errors
    /// `Error::InvalidOrder` if the configured order is 0.
    pub fn new(config: IndexConfig) -> Result<Self> {
        Self::with_root_slots(config, NodeSlots::empty_entries())
    }

    /// Create an index whose root holds child references but has none yet.
    ///
    /// Used to assemble a tree by hand with [`attach_leaf`](Self::attach_leaf)
    /// and [`attach_internal`](Self::attach_internal). Inserting before any
    /// child is attached reports `StatusCode::Exception`.
    pub fn with_internal_root(config: IndexConfig) -> Result<Self> {
        Self::with_root_slots(config, NodeSlots::empty_children())
    }

    fn with_root_slots(config: IndexConfig, slots: NodeSlots) -> Result<Self> {
        config.validate()?;
        let root = IndexNode::new(NodeRole::Root, None, config.order, slots);
        Ok(Self {
            nodes: vec![root],
            root: NodeId::new(0),
            config,
            stats: IndexStats::new(),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever allocated, reachable or not.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Result<&IndexNode> {
        self.nodes.get(id.0).ok_or(Error::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut IndexNode> {
        self.nodes.get_mut(id.0).ok_or(Error::NodeNotFound(id))
    }

    fn push_node(&mut self, node: IndexNode) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Number of levels along the leftmost path, root included.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.root;
        while let Some(&first) = self.nodes[current.0].children().and_then(|c| c.first()) {
            current = first;
            depth += 1;
        }
        depth
    }

    // ========================================================================
    // Assembly
    // ========================================================================

    /// Append an empty entry-holding child to `parent`, routed from `lower_bound`.
    ///
    /// # Errors
    /// - `Error::NotAnInternalNode` if `parent` holds entries
    /// - `Error::NodeFull` if `parent` has no free child slot
    pub fn attach_leaf(&mut self, parent: NodeId, lower_bound: OrderedKey) -> Result<NodeId> {
        self.attach(parent, lower_bound, NodeSlots::empty_entries())
    }

    /// Append an empty child-holding node to `parent`, routed from `lower_bound`.
    pub fn attach_internal(&mut self, parent: NodeId, lower_bound: OrderedKey) -> Result<NodeId> {
        self.attach(parent, lower_bound, NodeSlots::empty_children())
    }

    fn attach(&mut self, parent: NodeId, lower_bound: OrderedKey, slots: NodeSlots) -> Result<NodeId> {
        let order = self.config.order;
        let child = NodeId::new(self.nodes.len());

        let node = self.node_mut(parent)?;
        if node.holds_entries() {
            return Err(Error::NotAnInternalNode(parent));
        }
        if node.is_full() {
            return Err(Error::NodeFull(parent));
        }
        if let NodeSlots::Children {
            children,
            separators,
        } = node.slots_mut()
        {
            children.push(child);
            separators.push(lower_bound);
        }

        let role = match slots {
            NodeSlots::Entries(_) => NodeRole::Leaf,
            NodeSlots::Children { .. } => NodeRole::Internal,
        };
        Ok(self.push_node(IndexNode::new(role, Some(parent), order, slots)))
    }

    // ========================================================================
    // Public API: the engine contract
    // ========================================================================

    /// Insert an entry pointing at `rid`.
    ///
    /// Under [`InsertPolicy::Sketch`] this reports `StatusCode::Ok` even when
    /// the entry is dropped by a leaf split or a root split is discarded.
    /// Check [`stats`](Self::stats) to see whether that happened.
    pub fn insert(&mut self, entry: Entry, rid: RecordId) -> StatusCode {
        let result = self.try_insert(entry, rid);
        if let Err(e) = &result {
            debug!(error = %e, rid = %rid, "insert refused");
        }
        StatusCode::from_result(&result)
    }

    /// Remove an entry. Removes nothing: deletion is not implemented.
    pub fn delete(&mut self, entry: &Entry, rid: RecordId) -> StatusCode {
        trace!(key = ?entry.key(), rid = %rid, "delete ignored");
        StatusCode::Ok
    }

    /// Force dirty nodes to stable storage. Nodes are memory-only, so
    /// there is nothing to write.
    pub fn flush_pages(&mut self) -> StatusCode {
        trace!(nodes = self.nodes.len(), "flush_pages ignored");
        StatusCode::Ok
    }

    /// Insert an entry, returning the error instead of a status code.
    ///
    /// # Errors
    /// - `Error::EmptyInternalNode` if descent reaches a child-holding node with no children
    /// - `Error::MissingKey` (balanced only) if the entry has no key
    /// - `Error::EntryExists` (balanced only) if the same key and `rid` are already indexed
    pub fn try_insert(&mut self, entry: Entry, rid: RecordId) -> Result<()> {
        let slot = LeafSlot::new(entry, rid);

        match self.config.policy {
            InsertPolicy::Sketch => {
                if let Some(split) = self.insert_sketch(self.root, slot)? {
                    IndexStats::bump(&self.stats.discarded_siblings);
                    warn!(
                        root = %self.root,
                        sibling = %split.sibling,
                        "root split discarded; sibling entries are unreachable"
                    );
                }
            }
            InsertPolicy::Balanced => {
                let key = slot.key().copied().ok_or(Error::MissingKey)?;
                if self.search(&key).contains(&rid) {
                    return Err(Error::EntryExists);
                }
                if let Some(split) = self.insert_balanced(self.root, slot)? {
                    self.promote_root(split)?;
                }
            }
        }

        IndexStats::bump(&self.stats.inserts);
        Ok(())
    }

    // ========================================================================
    // Sketch insertion
    // ========================================================================

    fn insert_sketch(&mut self, node_id: NodeId, slot: LeafSlot) -> Result<Option<Split>> {
        let node = self.node(node_id)?;
        let child = match node.slots() {
            NodeSlots::Children {
                children,
                separators,
            } => {
                if children.is_empty() {
                    return Err(Error::EmptyInternalNode(node_id));
                }
                // First separator above the key; its left neighbour owns the key.
                let key = slot.key();
                let i = separators
                    .iter()
                    .position(|s| key < Some(s))
                    .unwrap_or(separators.len());
                children[i.saturating_sub(1).min(children.len() - 1)]
            }
            NodeSlots::Entries(_) => return self.insert_into_leaf_sketch(node_id, slot),
        };

        trace!(node = %node_id, child = %child, "descend");
        let Some(split) = self.insert_sketch(child, slot)? else {
            return Ok(None);
        };

        let node = self.node(node_id)?;
        let (full, is_root, own_parent) = (node.is_full(), node.role() == NodeRole::Root, node.parent());

        if !full {
            let sibling = self.node_mut(split.sibling)?;
            if sibling.parent().is_none() {
                sibling.set_parent(own_parent);
            }
            if let NodeSlots::Children { children, .. } = self.node_mut(node_id)?.slots_mut() {
                children.push(split.sibling);
            }
            return Ok(None);
        }

        IndexStats::bump(&self.stats.discarded_siblings);
        warn!(
            node = %node_id,
            sibling = %split.sibling,
            "node full; child sibling discarded before split"
        );

        let sibling = self.split_sketch(node_id)?;
        self.node_mut(sibling)?
            .set_parent(if is_root { Some(node_id) } else { None });
        IndexStats::bump(&self.stats.internal_splits);
        Ok(Some(Split {
            sibling,
            divider: None,
        }))
    }

    fn insert_into_leaf_sketch(&mut self, node_id: NodeId, slot: LeafSlot) -> Result<Option<Split>> {
        let node = self.node_mut(node_id)?;
        let capacity = node.capacity();
        let NodeSlots::Entries(entries) = node.slots_mut() else {
            return Err(Error::InvariantViolation(format!("{} holds no entries", node_id)));
        };

        if entries.len() < capacity {
            entries.push(slot);
            return Ok(None);
        }

        warn!(
            node = %node_id,
            key = ?slot.key(),
            rid = %slot.rid,
            "leaf full; entry dropped by split"
        );
        IndexStats::bump(&self.stats.dropped_entries);
        IndexStats::bump(&self.stats.leaf_splits);

        let sibling = self.split_sketch(node_id)?;
        Ok(Some(Split {
            sibling,
            divider: None,
        }))
    }

    /// Move the upper half of `node_id` into a new node sharing its parent.
    ///
    /// The new node is tagged `Leaf` whatever it holds.
    fn split_sketch(&mut self, node_id: NodeId) -> Result<NodeId> {
        let order = self.config.order;
        let node = self.node_mut(node_id)?;
        let parent = node.parent();
        let upper = node.split_off_upper();

        let sibling = self.push_node(IndexNode::new(NodeRole::Leaf, parent, order, upper));
        debug!(node = %node_id, sibling = %sibling, "split");
        Ok(sibling)
    }

    // ========================================================================
    // Balanced insertion
    // ========================================================================

    fn insert_balanced(&mut self, node_id: NodeId, slot: LeafSlot) -> Result<Option<Split>> {
        let node = self.node(node_id)?;
        let (child, index) = match node.slots() {
            NodeSlots::Children {
                children,
                separators,
            } => {
                if children.is_empty() {
                    return Err(Error::EmptyInternalNode(node_id));
                }
                let key = slot.key();
                let index = separators
                    .partition_point(|s| Some(s) <= key)
                    .saturating_sub(1)
                    .min(children.len() - 1);
                (children[index], index)
            }
            NodeSlots::Entries(_) => return self.insert_into_leaf_balanced(node_id, slot),
        };

        // A key below every separator widens child 0's lower bound.
        if index == 0 {
            if let (Some(&key), NodeSlots::Children { separators, .. }) =
                (slot.key(), self.node_mut(node_id)?.slots_mut())
            {
                if let Some(first) = separators.first_mut() {
                    if key < *first {
                        *first = key;
                    }
                }
            }
        }

        trace!(node = %node_id, child = %child, "descend");
        let Some(split) = self.insert_balanced(child, slot)? else {
            return Ok(None);
        };
        self.absorb_balanced(node_id, index, split)
    }

    fn insert_into_leaf_balanced(&mut self, node_id: NodeId, slot: LeafSlot) -> Result<Option<Split>> {
        let order = self.config.order;
        let node = self.node_mut(node_id)?;
        let parent = node.parent();
        let capacity = node.capacity();
        let NodeSlots::Entries(entries) = node.slots_mut() else {
            return Err(Error::InvariantViolation(format!("{} holds no entries", node_id)));
        };

        // After any equal keys, so duplicates keep insertion order.
        let key = slot.key().copied();
        let pos = entries.partition_point(|e| e.key().copied() <= key);
        entries.insert(pos, slot);

        if entries.len() <= capacity {
            return Ok(None);
        }

        let upper = entries.split_off(order);
        let divider = upper
            .first()
            .and_then(|s| s.key().copied())
            .ok_or(Error::MissingKey)?;

        let sibling = self.push_node(IndexNode::new(
            NodeRole::Leaf,
            parent,
            order,
            NodeSlots::Entries(upper),
        ));
        IndexStats::bump(&self.stats.leaf_splits);
        debug!(node = %node_id, sibling = %sibling, divider = %divider, "leaf split");

        Ok(Some(Split {
            sibling,
            divider: Some(divider),
        }))
    }

    /// Link `split` right after `children[index]`, splitting this node if it overflows.
    fn absorb_balanced(&mut self, node_id: NodeId, index: usize, split: Split) -> Result<Option<Split>> {
        let order = self.config.order;
        let divider = split.divider.ok_or_else(|| {
            Error::InvariantViolation(format!("{} split without a divider", split.sibling))
        })?;
        self.node_mut(split.sibling)?.set_parent(Some(node_id));

        let node = self.node_mut(node_id)?;
        let parent = node.parent();
        let capacity = node.capacity();
        let NodeSlots::Children {
            children,
            separators,
        } = node.slots_mut()
        else {
            return Err(Error::NotAnInternalNode(node_id));
        };
        if separators.len() != children.len() {
            return Err(Error::InvariantViolation(format!(
                "{} has {} children but {} separators",
                node_id,
                children.len(),
                separators.len()
            )));
        }

        children.insert(index + 1, split.sibling);
        separators.insert(index + 1, divider);

        if children.len() <= capacity {
            return Ok(None);
        }

        let moved = children.split_off(order);
        let upper_separators = separators.split_off(order);
        let divider = upper_separators.first().copied().ok_or_else(|| {
            Error::InvariantViolation(format!("{} split with no upper separators", node_id))
        })?;

        let sibling = self.push_node(IndexNode::new(
            NodeRole::Internal,
            parent,
            order,
            NodeSlots::Children {
                children: moved.clone(),
                separators: upper_separators,
            },
        ));
        for child in moved {
            self.node_mut(child)?.set_parent(Some(sibling));
        }
        IndexStats::bump(&self.stats.internal_splits);
        debug!(node = %node_id, sibling = %sibling, divider = %divider, "internal split");

        Ok(Some(Split {
            sibling,
            divider: Some(divider),
        }))
    }

    /// Put a new root above the old root and the sibling it split into.
    fn promote_root(&mut self, split: Split) -> Result<()> {
        let order = self.config.order;
        let old_root = self.root;
        let divider = split.divider.ok_or_else(|| {
            Error::InvariantViolation(format!("{} split without a divider", split.sibling))
        })?;

        let old = self.node_mut(old_root)?;
        let low = old.lowest_key().unwrap_or(divider);
        let demoted = if old.holds_entries() {
            NodeRole::Leaf
        } else {
            NodeRole::Internal
        };
        old.set_role(demoted);

        let new_root = self.push_node(IndexNode::new(
            NodeRole::Root,
            None,
            order,
            NodeSlots::Children {
                children: vec![old_root, split.sibling],
                separators: vec![low, divider],
            },
        ));
        self.node_mut(old_root)?.set_parent(Some(new_root));
        self.node_mut(split.sibling)?.set_parent(Some(new_root));
        self.root = new_root;

        IndexStats::bump(&self.stats.root_promotions);
        debug!(old_root = %old_root, new_root = %new_root, divider = %divider, "root promoted");
        Ok(())
    }

    // ========================================================================
    // Read side
    // ========================================================================

    /// Record ids of every reachable entry whose key equals `key`.
    ///
    /// Follows separator routing, so on a sketch tree entries in unrouted
    /// siblings are not found.
    pub fn search(&self, key: &OrderedKey) -> Vec<RecordId> {
        let mut found = Vec::new();
        self.collect_matches(self.root, key, &mut found);
        found
    }

    fn collect_matches(&self, node_id: NodeId, key: &OrderedKey, found: &mut Vec<RecordId>) {
        match self.nodes[node_id.0].slots() {
            NodeSlots::Children {
                children,
                separators,
            } => {
                if children.is_empty() {
                    return;
                }
                // Equal keys may sit on both sides of a separator equal to them.
                let last = children.len() - 1;
                let lo = separators
                    .partition_point(|s| s < key)
                    .saturating_sub(1)
                    .min(last);
                let hi = separators
                    .partition_point(|s| s <= key)
                    .saturating_sub(1)
                    .min(last);
                for &child in &children[lo..=hi] {
                    self.collect_matches(child, key, found);
                }
            }
            NodeSlots::Entries(entries) => found.extend(
                entries
                    .iter()
                    .filter(|s| s.key() == Some(key))
                    .map(|s| s.rid),
            ),
        }
    }

    /// Every leaf slot reachable from the root, in left-to-right order.
    pub fn reachable_entries(&self) -> Vec<LeafSlot> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.nodes[id.0].slots() {
                NodeSlots::Children { children, .. } => stack.extend(children.iter().rev()),
                NodeSlots::Entries(entries) => out.extend(entries.iter().cloned()),
            }
        }
        out
    }

    // ========================================================================
    // Structural checks
    // ========================================================================

    /// Verify the invariants the configured policy maintains.
    ///
    /// Every policy: slot counts within capacity, separators non-decreasing.
    /// Balanced additionally: parent links, sorted leaves, key bounds,
    /// minimum occupancy below the root, and uniform leaf depth.
    ///
    /// # Errors
    /// `Error::InvariantViolation` describing the first breach found.
    pub fn check_structure(&self) -> Result<()> {
        for (i, node) in self.nodes.iter().enumerate() {
            let id = NodeId::new(i);
            if node.slot_count() > node.capacity() {
                return Err(Error::InvariantViolation(format!(
                    "{} holds {} slots, capacity {}",
                    id,
                    node.slot_count(),
                    node.capacity()
                )));
            }
            if let Some(separators) = node.separators() {
                if separators.len() > self.config.separator_capacity() {
                    return Err(Error::InvariantViolation(format!(
                        "{} holds {} separators",
                        id,
                        separators.len()
                    )));
                }
                if separators.windows(2).any(|w| w[0] > w[1]) {
                    return Err(Error::InvariantViolation(format!(
                        "separators of {} out of order",
                        id
                    )));
                }
            }
        }

        if self.config.policy == InsertPolicy::Balanced {
            self.check_subtree(self.root, None, None, None)?;
        }
        Ok(())
    }

    /// Returns the height of the subtree rooted at `node_id`.
    fn check_subtree(
        &self,
        node_id: NodeId,
        parent: Option<NodeId>,
        lower: Option<OrderedKey>,
        upper: Option<OrderedKey>,
    ) -> Result<usize> {
        let violation = |msg: String| Err(Error::InvariantViolation(msg));
        let node = self.node(node_id)?;
        let is_root = node_id == self.root;

        if node.parent() != parent {
            return violation(format!(
                "{} has parent {:?}, expected {:?}",
                node_id,
                node.parent(),
                parent
            ));
        }
        if is_root != (node.role() == NodeRole::Root) {
            return violation(format!("{} has role {:?}", node_id, node.role()));
        }
        if !is_root && node.slot_count() < node.order() {
            return violation(format!(
                "{} is underfull: {} slots, order {}",
                node_id,
                node.slot_count(),
                node.order()
            ));
        }

        match node.slots() {
            NodeSlots::Entries(entries) => {
                if entries.windows(2).any(|w| w[0].key() > w[1].key()) {
                    return violation(format!("entries of {} out of order", node_id));
                }
                for slot in entries {
                    let key = slot.key().copied();
                    if (lower.is_some() && key < lower) || (upper.is_some() && key > upper) {
                        return violation(format!(
                            "{} holds {:?} outside [{:?}, {:?}]",
                            node_id, key, lower, upper
                        ));
                    }
                }
                Ok(1)
            }
            NodeSlots::Children {
                children,
                separators,
            } => {
                if children.is_empty() {
                    return Err(Error::EmptyInternalNode(node_id));
                }
                if separators.len() != children.len() {
                    return violation(format!(
                        "{} has {} children but {} separators",
                        node_id,
                        children.len(),
                        separators.len()
                    ));
                }

                let mut height = None;
                for (j, &child) in children.iter().enumerate() {
                    let lo = lower.max(Some(separators[j]));
                    let hi = separators.get(j + 1).copied().or(upper);
                    let h = self.check_subtree(child, Some(node_id), lo, hi)?;
                    match height {
                        None => height = Some(h),
                        Some(prev) if prev != h => {
                            return violation(format!("leaves below {} at uneven depth", node_id));
                        }
                        Some(_) => {}
                    }
                }
                Ok(height.unwrap_or(0) + 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sketch(order: usize) -> IndexHandle {
        IndexHandle::new(IndexConfig::new(order, InsertPolicy::Sketch)).unwrap()
    }

    fn balanced(order: usize) -> IndexHandle {
        IndexHandle::new(IndexConfig::new(order, InsertPolicy::Balanced)).unwrap()
    }

    fn entry(k: i64) -> Entry {
        Entry::keyed(OrderedKey::new(k))
    }

    fn rid(k: i64) -> RecordId {
        RecordId::new(k as i32, 0)
    }

    fn keys_of(slots: &[LeafSlot]) -> Vec<i64> {
        slots.iter().map(|s| s.key().unwrap().value()).collect()
    }

    #[test]
    fn test_zero_order_rejected() {
        let err = IndexHandle::new(IndexConfig::default().with_order(0)).unwrap_err();
        assert_eq!(err, Error::InvalidOrder(0));
    }

    #[test]
    fn test_fresh_root_holds_entries() {
        let index = sketch(2);
        let root = index.node(index.root()).unwrap();
        assert_eq!(root.role(), NodeRole::Root);
        assert!(root.holds_entries());
        assert_eq!(root.slot_count(), 0);
        assert_eq!(index.depth(), 1);
    }

    #[test]
    fn test_node_lookup_out_of_range() {
        let index = sketch(2);
        assert_eq!(
            index.node(NodeId::new(9)).unwrap_err(),
            Error::NodeNotFound(NodeId::new(9))
        );
    }

    #[test]
    fn test_split_sketch_halves_full_leaf() {
        let mut index = sketch(3);
        for k in 1..=6 {
            index.try_insert(entry(k), rid(k)).unwrap();
        }
        let before = index.reachable_entries();

        let sibling = index.split_sketch(index.root()).unwrap();

        let left = index.node(index.root()).unwrap().entries().unwrap().to_vec();
        let right = index.node(sibling).unwrap().entries().unwrap().to_vec();
        assert_eq!(left.len(), 3);
        assert_eq!(right.len(), 3);
        assert_eq!([left, right].concat(), before);
        assert_eq!(index.node(sibling).unwrap().role(), NodeRole::Leaf);
    }

    #[test]
    fn test_sketch_leaf_keeps_arrival_order() {
        let mut index = sketch(2);
        for k in [4, 1, 3, 2] {
            index.try_insert(entry(k), rid(k)).unwrap();
        }
        assert_eq!(keys_of(&index.reachable_entries()), vec![4, 1, 3, 2]);
    }

    #[test]
    fn test_sketch_empty_internal_root_is_exception() {
        let mut index =
            IndexHandle::with_internal_root(IndexConfig::new(2, InsertPolicy::Sketch)).unwrap();
        assert_eq!(
            index.try_insert(entry(1), rid(1)).unwrap_err(),
            Error::EmptyInternalNode(index.root())
        );
        assert_eq!(index.insert(entry(1), rid(1)), StatusCode::Exception);
    }

    #[test]
    fn test_sketch_child_split_absorbed_without_separator() {
        let mut index =
            IndexHandle::with_internal_root(IndexConfig::new(2, InsertPolicy::Sketch)).unwrap();
        let root = index.root();
        let leaf = index.attach_leaf(root, OrderedKey::new(0)).unwrap();

        for k in 1..=5 {
            assert_eq!(index.insert(entry(k), rid(k)), StatusCode::Ok);
        }

        // Leaf split once; the sibling joined the root with no separator.
        let root_node = index.node(root).unwrap();
        assert_eq!(root_node.slot_count(), 2);
        assert_eq!(root_node.separators().unwrap().len(), 1);

        let sibling = root_node.children().unwrap()[1];
        assert_eq!(index.node(sibling).unwrap().parent(), Some(root));
        assert_eq!(keys_of(index.node(leaf).unwrap().entries().unwrap()), vec![1, 2]);
        assert_eq!(keys_of(index.node(sibling).unwrap().entries().unwrap()), vec![3, 4]);
        assert_eq!(index.stats().dropped_entries, 1);

        // Routing never reaches the sibling.
        assert!(index.search(&OrderedKey::new(3)).is_empty());
        assert_eq!(index.search(&OrderedKey::new(1)), vec![rid(1)]);
    }

    #[test]
    fn test_sketch_full_root_split_sibling_tagged_leaf() {
        let mut index =
            IndexHandle::with_internal_root(IndexConfig::new(1, InsertPolicy::Sketch)).unwrap();
        let root = index.root();
        let left = index.attach_leaf(root, OrderedKey::new(0)).unwrap();
        index.attach_leaf(root, OrderedKey::new(100)).unwrap();

        // Fill the left leaf, then overflow it: the root is already full.
        index.try_insert(entry(1), rid(1)).unwrap();
        index.try_insert(entry(2), rid(2)).unwrap();
        index.try_insert(entry(3), rid(3)).unwrap();

        let stats = index.stats();
        assert_eq!(stats.leaf_splits, 1);
        assert_eq!(stats.internal_splits, 1);
        // The leaf sibling, then the root sibling, were both left unlinked.
        assert_eq!(stats.discarded_siblings, 2);

        let root_node = index.node(root).unwrap();
        assert_eq!(root_node.children().unwrap(), &[left]);

        // Root split sibling: child storage, leaf role, parent is the old root.
        let root_sibling = NodeId::new(index.node_count() - 1);
        let node = index.node(root_sibling).unwrap();
        assert_eq!(node.role(), NodeRole::Leaf);
        assert!(!node.holds_entries());
        assert_eq!(node.parent(), Some(root));
        assert_eq!(node.slot_count(), 1);
    }

    #[test]
    fn test_attach_errors() {
        let mut index = sketch(1);
        let root = index.root();
        assert_eq!(
            index.attach_leaf(root, OrderedKey::new(0)).unwrap_err(),
            Error::NotAnInternalNode(root)
        );

        let mut index =
            IndexHandle::with_internal_root(IndexConfig::new(1, InsertPolicy::Sketch)).unwrap();
        let root = index.root();
        index.attach_leaf(root, OrderedKey::new(0)).unwrap();
        index.attach_internal(root, OrderedKey::new(5)).unwrap();
        assert_eq!(
            index.attach_leaf(root, OrderedKey::new(9)).unwrap_err(),
            Error::NodeFull(root)
        );
    }

    #[test]
    fn test_balanced_leaf_sorted() {
        let mut index = balanced(3);
        for k in [5, 3, 9, 1, 7] {
            index.try_insert(entry(k), rid(k)).unwrap();
        }
        assert_eq!(keys_of(&index.reachable_entries()), vec![1, 3, 5, 7, 9]);
        index.check_structure().unwrap();
    }

    #[test]
    fn test_balanced_root_promotion() {
        let mut index = balanced(2);
        for k in 1..=5 {
            index.try_insert(entry(k), rid(k)).unwrap();
        }

        assert_eq!(index.depth(), 2);
        assert_eq!(index.stats().root_promotions, 1);
        let root = index.node(index.root()).unwrap();
        assert_eq!(root.role(), NodeRole::Root);
        assert_eq!(root.slot_count(), 2);
        assert_eq!(root.separators().unwrap(), &[OrderedKey::new(1), OrderedKey::new(3)]);

        let old_root = index.node(NodeId::new(0)).unwrap();
        assert_eq!(old_root.role(), NodeRole::Leaf);
        assert_eq!(old_root.parent(), Some(index.root()));

        assert_eq!(keys_of(&index.reachable_entries()), vec![1, 2, 3, 4, 5]);
        index.check_structure().unwrap();
    }

    #[test]
    fn test_balanced_internal_split_preserves_role() {
        let mut index = balanced(1);
        for k in 1..=8 {
            index.try_insert(entry(k), rid(k)).unwrap();
        }
        index.check_structure().unwrap();
        assert!(index.stats().internal_splits > 0);
        assert!(index.depth() >= 3);
        for i in 0..index.node_count() {
            let node = index.node(NodeId::new(i)).unwrap();
            if NodeId::new(i) != index.root() && !node.holds_entries() {
                assert_eq!(node.role(), NodeRole::Internal);
            }
        }
        for k in 1..=8 {
            assert_eq!(index.search(&OrderedKey::new(k)), vec![rid(k)]);
        }
    }

    #[test]
    fn test_balanced_rejects_duplicate_pair() {
        let mut index = balanced(2);
        index.try_insert(entry(7), rid(7)).unwrap();
        assert_eq!(index.try_insert(entry(7), rid(7)).unwrap_err(), Error::EntryExists);
        assert_eq!(index.insert(entry(7), rid(7)), StatusCode::Error);
        assert_eq!(index.insert(entry(7), RecordId::new(7, 1)), StatusCode::Ok);
        assert_eq!(index.stats().inserts, 2);
    }

    #[test]
    fn test_balanced_rejects_missing_key() {
        let mut index = balanced(2);
        assert_eq!(
            index.try_insert(Entry::unkeyed(), rid(0)).unwrap_err(),
            Error::MissingKey
        );
    }

    #[test]
    fn test_balanced_key_below_first_separator() {
        let mut index = balanced(1);
        for k in [5, 6, 7, 1, 0] {
            index.try_insert(entry(k), rid(k)).unwrap();
        }
        index.check_structure().unwrap();

        let root = index.node(index.root()).unwrap();
        assert_eq!(root.separators().unwrap()[0], OrderedKey::new(0));
        assert_eq!(keys_of(&index.reachable_entries()), vec![0, 1, 5, 6, 7]);
        for k in [5, 6, 7, 1, 0] {
            assert_eq!(index.search(&OrderedKey::new(k)), vec![rid(k)]);
        }
    }

    #[test]
    fn test_balanced_descending_keys() {
        let mut index = balanced(1);
        for k in (0..40).rev() {
            index.try_insert(entry(k), rid(k)).unwrap();
            index.check_structure().unwrap();
        }
        assert_eq!(keys_of(&index.reachable_entries()), (0..40).collect::<Vec<_>>());
        for k in 0..40 {
            assert_eq!(index.search(&OrderedKey::new(k)), vec![rid(k)]);
        }
    }

    #[test]
    fn test_balanced_smaller_duplicates_after_split() {
        let mut index = balanced(1);
        for (slot, k) in [0, 0, 0, -1, -1].into_iter().enumerate() {
            index
                .try_insert(entry(k), RecordId::new(slot as i32, 0))
                .unwrap();
        }
        index.check_structure().unwrap();
        assert_eq!(
            index.search(&OrderedKey::new(-1)),
            vec![RecordId::new(3, 0), RecordId::new(4, 0)]
        );
        assert_eq!(index.search(&OrderedKey::new(0)).len(), 3);
    }

    #[test]
    fn test_balanced_duplicates_across_leaves() {
        let mut index = balanced(1);
        let key = OrderedKey::new(4);
        for slot in 0..6 {
            index
                .try_insert(Entry::keyed(key), RecordId::new(4, slot))
                .unwrap();
        }
        index.check_structure().unwrap();
        let found = index.search(&key);
        assert_eq!(found, (0..6).map(|s| RecordId::new(4, s)).collect::<Vec<_>>());
    }

    #[test]
    fn test_check_structure_flags_unsorted_separators() {
        let mut index =
            IndexHandle::with_internal_root(IndexConfig::new(2, InsertPolicy::Sketch)).unwrap();
        let root = index.root();
        index.attach_leaf(root, OrderedKey::new(10)).unwrap();
        index.attach_leaf(root, OrderedKey::new(5)).unwrap();
        assert!(matches!(
            index.check_structure(),
            Err(Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_delete_and_flush_are_inert() {
        let mut index = sketch(2);
        index.try_insert(entry(1), rid(1)).unwrap();
        assert_eq!(index.delete(&entry(1), rid(1)), StatusCode::Ok);
        assert_eq!(index.flush_pages(), StatusCode::Ok);
        assert_eq!(index.search(&OrderedKey::new(1)), vec![rid(1)]);
    }
}
