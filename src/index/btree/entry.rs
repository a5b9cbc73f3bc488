//! Leaf-level payloads.

use crate::common::config::ENTRY_CAPACITY;
use crate::common::RecordId;
use crate::index::btree::OrderedKey;

/// A caller-built payload: an optional search key plus opaque bytes.
///
/// The index reads only the key. The payload travels with the entry and is
/// never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    key: Option<OrderedKey>,
    payload: Vec<u8>,
}

impl Entry {
    pub fn new(key: Option<OrderedKey>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            key,
            payload: payload.into(),
        }
    }

    /// An entry carrying only a key.
    pub fn keyed(key: OrderedKey) -> Self {
        Self::new(Some(key), Vec::new())
    }

    /// An entry with neither key nor payload.
    pub fn unkeyed() -> Self {
        Self::default()
    }

    #[inline]
    pub fn key(&self) -> Option<&OrderedKey> {
        self.key.as_ref()
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Nominal payload size class. Not checked against [`payload`](Self::payload).
    #[inline]
    pub fn capacity(&self) -> usize {
        ENTRY_CAPACITY
    }
}

/// One occupied leaf slot: the entry and the record it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafSlot {
    pub entry: Entry,
    pub rid: RecordId,
}

impl LeafSlot {
    pub fn new(entry: Entry, rid: RecordId) -> Self {
        Self { entry, rid }
    }

    #[inline]
    pub fn key(&self) -> Option<&OrderedKey> {
        self.entry.key()
    }
}
