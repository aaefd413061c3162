//! This module defines the core, strongly-typed data representations shared by
//! the analyser, the converter and the persisted schema metadata.
//!
//! It currently includes the canonical `StorageType` enum, the storage type tag
//! recorded for every exported field.

pub mod storage_type;

// Re-export the main type(s) for easier access.
pub use storage_type::StorageType;
