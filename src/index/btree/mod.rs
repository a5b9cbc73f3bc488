//! B+ tree index implementation.
//!
//! # Components
//! - [`OrderedKey`] / [`KeyProjection`] - search keys and how source values become keys
//! - [`Entry`] / [`LeafSlot`] - leaf payloads and the record ids they point at
//! - [`IndexNode`] - a node with role-tagged, sum-typed slot storage
//! - [`IndexHandle`] - the node arena and the insertion protocol
//! - [`IndexStats`] - split and data-loss counters

mod entry;
mod handle;
mod key;
mod node;
mod stats;

pub use entry::{Entry, LeafSlot};
pub use handle::IndexHandle;
pub use key::{KeyProjection, OrderedKey};
pub use node::{IndexNode, NodeRole, NodeSlots};
pub use stats::{IndexStats, StatsSnapshot};
