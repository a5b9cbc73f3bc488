//! Error types for the index.

use thiserror::Error;

use crate::common::NodeId;

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors raised while operating on an index.
///
/// Public entry points that follow the status-code contract fold these into
/// a [`StatusCode`](crate::StatusCode); the `try_*` variants return them as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The fan-out order must be at least 1.
    #[error("Invalid fan-out order: {0}")]
    InvalidOrder(usize),

    /// The same key and record id pair is already indexed.
    #[error("Entry already exists")]
    EntryExists,

    /// A balanced index cannot place an entry without a key.
    #[error("Entry has no key")]
    MissingKey,

    /// Descent reached a node that holds child references but has none.
    #[error("{0} has no children to descend into")]
    EmptyInternalNode(NodeId),

    /// The node stores entries, not child references.
    #[error("{0} does not hold child references")]
    NotAnInternalNode(NodeId),

    /// The node has no free slot.
    #[error("{0} is full")]
    NodeFull(NodeId),

    /// The node id does not refer to a node of this index.
    #[error("{0} not found")]
    NodeNotFound(NodeId),

    /// A structural check found a broken tree.
    ///
    /// This indicates a bug in the insertion path or a hand-built tree
    /// that was assembled inconsistently.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}
