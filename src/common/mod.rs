//! Common types and utilities shared across the index.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants and [`IndexConfig`]
//! - Error types and the [`StatusCode`] return contract
//! - Identifiers ([`NodeId`], [`RecordId`])

pub mod config;
pub mod error;
mod node_id;
mod record_id;
mod status;

pub use config::{IndexConfig, InsertPolicy};
pub use error::{Error, Result};
pub use node_id::NodeId;
pub use record_id::RecordId;
pub use status::StatusCode;
