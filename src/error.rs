// In: src/error.rs

//! This module defines the single, unified error type for the entire packrat library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

use crate::compression::CompressorId;
use crate::types::StorageType;

#[derive(Error, Debug)]
pub enum PackratError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// A directive or configuration value is invalid. Raised at analysis or
    /// configuration time and never retried.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A schema entry references a compressor that is not in the registry.
    #[error("Unknown compressor '{0}': no implementation is registered under this identity")]
    UnknownCompressor(CompressorId),

    /// The storage record (or batch) does not have the shape the schema expects.
    #[error("Field mismatch: {0}")]
    FieldMismatch(String),

    #[error("Unsupported data type for this operation: {0}")]
    UnsupportedType(String),

    #[error("Record serialization/deserialization failed: {0}")]
    FrameFormatError(String),

    /// Wraps a failure so the caller can tell which field aborted the record.
    #[error("Field '{field}' failed: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<PackratError>,
    },

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error originating from the underlying I/O subsystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically during schema or config (de)serialization.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    // =========================================================================
    // === Low-Level Codec/Kernel Errors
    // =========================================================================
    #[error("Compression failed: {0}")]
    Encode(String),

    #[error("Decompression failed: {0}")]
    Decode(String),

    #[error("Invalid bytes for {storage_type} field: {reason}")]
    InvalidFieldBytes {
        storage_type: StorageType,
        reason: String,
    },

    #[error("LEB128 decoding error: {0}")]
    Leb128DecodeError(String),
}

impl PackratError {
    /// Scopes an error to the named field.
    pub(crate) fn in_field(self, field: &str) -> Self {
        PackratError::Field {
            field: field.to_string(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, looking through any `Field` wrappers.
    pub fn root_cause(&self) -> &PackratError {
        match self {
            PackratError::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
