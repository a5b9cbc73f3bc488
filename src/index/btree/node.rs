//! Index nodes.
//!
//! A node's slots are a sum type: either child references with their
//! separator keys, or leaf entries. The kind is fixed when the node is
//! created, so a leaf can never be read as if it held children.
//!
//! ```text
//!   0    1    2    3    4        ← children
//! | 0 || 1 || 2 || 3 || 4 |      ← separators
//! ```
//!
//! `separators[i]` is the inclusive lower bound of `children[i]` and the
//! exclusive upper bound of `children[i - 1]`.

use crate::common::NodeId;
use crate::index::btree::{LeafSlot, OrderedKey};

/// Position of a node in its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Root,
    Internal,
    Leaf,
}

/// Slot storage of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSlots {
    /// Child references and the separator keys that route between them.
    Children {
        children: Vec<NodeId>,
        separators: Vec<OrderedKey>,
    },
    /// Leaf payloads.
    Entries(Vec<LeafSlot>),
}

impl NodeSlots {
    pub fn empty_children() -> Self {
        NodeSlots::Children {
            children: Vec::new(),
            separators: Vec::new(),
        }
    }

    pub fn empty_entries() -> Self {
        NodeSlots::Entries(Vec::new())
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            NodeSlots::Children { children, .. } => children.len(),
            NodeSlots::Entries(entries) => entries.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node of an index tree.
///
/// Nodes live in the arena of an [`IndexHandle`](crate::index::btree::IndexHandle)
/// and refer to each other by [`NodeId`]. The parent link is a plain id and
/// never owns anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexNode {
    role: NodeRole,
    parent: Option<NodeId>,
    order: usize,
    slots: NodeSlots,
}

impl IndexNode {
    pub(crate) fn new(
        role: NodeRole,
        parent: Option<NodeId>,
        order: usize,
        slots: NodeSlots,
    ) -> Self {
        Self {
            role,
            parent,
            order,
            slots,
        }
    }

    #[inline]
    pub fn role(&self) -> NodeRole {
        self.role
    }

    #[inline]
    pub(crate) fn set_role(&mut self, role: NodeRole) {
        self.role = role;
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    pub fn slots(&self) -> &NodeSlots {
        &self.slots
    }

    #[inline]
    pub(crate) fn slots_mut(&mut self) -> &mut NodeSlots {
        &mut self.slots
    }

    /// Number of occupied child or entry slots.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        2 * self.order
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.slot_count() >= self.capacity()
    }

    #[inline]
    pub fn holds_entries(&self) -> bool {
        matches!(self.slots, NodeSlots::Entries(_))
    }

    pub fn children(&self) -> Option<&[NodeId]> {
        match &self.slots {
            NodeSlots::Children { children, .. } => Some(children),
            NodeSlots::Entries(_) => None,
        }
    }

    pub fn separators(&self) -> Option<&[OrderedKey]> {
        match &self.slots {
            NodeSlots::Children { separators, .. } => Some(separators),
            NodeSlots::Entries(_) => None,
        }
    }

    pub fn entries(&self) -> Option<&[LeafSlot]> {
        match &self.slots {
            NodeSlots::Entries(entries) => Some(entries),
            NodeSlots::Children { .. } => None,
        }
    }

    /// Smallest key this node is known to cover, if any.
    pub(crate) fn lowest_key(&self) -> Option<OrderedKey> {
        match &self.slots {
            NodeSlots::Children { separators, .. } => separators.first().copied(),
            NodeSlots::Entries(entries) => entries.first().and_then(|s| s.key().copied()),
        }
    }

    /// Move slots `order..` out of this node.
    ///
    /// Child references move without their separators; the caller decides
    /// what the new node's separators are. Returns storage of the same kind
    /// as this node's.
    pub fn split_off_upper(&mut self) -> NodeSlots {
        let at = self.order.min(self.slot_count());
        match &mut self.slots {
            NodeSlots::Children { children, .. } => NodeSlots::Children {
                children: children.split_off(at),
                separators: Vec::new(),
            },
            NodeSlots::Entries(entries) => NodeSlots::Entries(entries.split_off(at)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RecordId;
    use crate::index::btree::Entry;

    fn leaf_with(order: usize, keys: &[i64]) -> IndexNode {
        let entries = keys
            .iter()
            .map(|&k| LeafSlot::new(Entry::keyed(OrderedKey::new(k)), RecordId::new(0, k as i32)))
            .collect();
        IndexNode::new(NodeRole::Leaf, None, order, NodeSlots::Entries(entries))
    }

    #[test]
    fn test_empty_node() {
        let node = IndexNode::new(NodeRole::Root, None, 2, NodeSlots::empty_entries());
        assert_eq!(node.slot_count(), 0);
        assert_eq!(node.capacity(), 4);
        assert!(!node.is_full());
        assert!(node.holds_entries());
        assert!(node.children().is_none());
        assert!(node.separators().is_none());
    }

    #[test]
    fn test_full_leaf() {
        let node = leaf_with(2, &[1, 2, 3, 4]);
        assert!(node.is_full());
        assert_eq!(node.lowest_key(), Some(OrderedKey::new(1)));
    }

    #[test]
    fn test_split_off_upper_halves_entries() {
        let mut node = leaf_with(2, &[1, 2, 3, 4]);
        let before: Vec<_> = node.entries().unwrap().to_vec();

        let upper = node.split_off_upper();

        assert_eq!(node.slot_count(), 2);
        assert_eq!(upper.len(), 2);

        let mut union: Vec<_> = node.entries().unwrap().to_vec();
        match upper {
            NodeSlots::Entries(moved) => union.extend(moved),
            NodeSlots::Children { .. } => panic!("leaf split produced child storage"),
        }
        assert_eq!(union, before);
    }

    #[test]
    fn test_split_off_upper_keeps_child_storage() {
        let children = (0..4).map(NodeId::new).collect();
        let separators = (0..4).map(|k| OrderedKey::new(k * 10)).collect();
        let mut node = IndexNode::new(
            NodeRole::Internal,
            None,
            2,
            NodeSlots::Children {
                children,
                separators,
            },
        );

        let upper = node.split_off_upper();

        assert_eq!(node.children().unwrap(), &[NodeId::new(0), NodeId::new(1)]);
        match upper {
            NodeSlots::Children {
                children,
                separators,
            } => {
                assert_eq!(children, vec![NodeId::new(2), NodeId::new(3)]);
                assert!(separators.is_empty());
            }
            NodeSlots::Entries(_) => panic!("internal split produced entry storage"),
        }
    }
}
