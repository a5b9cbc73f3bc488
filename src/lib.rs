//! ixtree - a B+ tree index access method for a record-oriented storage engine.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Storage engine (caller)                    │
//! │        insert(entry, rid) / delete(entry, rid) / flush_pages    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                ↓ StatusCode
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                Index Layer (index/btree/)                       │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │ IndexHandle: node arena + split-and-propagate insertion    │  │
//! │  │   policy: Sketch | Balanced                                │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │  ┌──────────────┐  ┌──────────────┐  ┌───────────────────────┐  │
//! │  │ IndexNode    │  │ Entry        │  │ OrderedKey            │  │
//! │  │ Root|Internal│  │ key + bytes  │  │ KeyProjection (crc32) │  │
//! │  │ |Leaf        │  │              │  │                       │  │
//! │  └──────────────┘  └──────────────┘  └───────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │          Common (common/): config, Error, StatusCode, ids       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, RecordId, Error, StatusCode, config)
//! - [`index`] - Index structures (B+ tree)
//!
//! # Quick Start
//! ```
//! use ixtree::{IndexConfig, IndexHandle, RecordId, StatusCode};
//! use ixtree::index::btree::{Entry, OrderedKey};
//!
//! let mut index = IndexHandle::new(IndexConfig::default()).unwrap();
//! let status = index.insert(Entry::keyed(OrderedKey::from_source("alice")), RecordId::new(1, 0));
//! assert_eq!(status, StatusCode::Ok);
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_ORDER, ENTRY_CAPACITY};
pub use common::{Error, IndexConfig, InsertPolicy, NodeId, RecordId, Result, StatusCode};

pub use index::btree::{Entry, IndexHandle, OrderedKey, StatsSnapshot};
