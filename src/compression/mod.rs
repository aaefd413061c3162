// In: src/compression/mod.rs

//! The pluggable compression capability.
//!
//! A `Compressor` is a pure byte-array transform with a forward and an inverse
//! operation. Variants are never selected by type: schema entries carry a
//! `CompressorId`, and the `CompressorRegistry` resolves that identity to an
//! implementation at encode/decode time.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PackratError;

mod builtin;
pub mod registry;

pub use builtin::{DeflateCompressor, XzCompressor, ZstdCompressor};
pub use registry::CompressorRegistry;

//==================================================================================
// 1. Compressor Identity
//==================================================================================

/// The stable identity of a compressor variant.
///
/// Identities are persisted with the schema, so renaming a registered variant
/// makes existing records undecodable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompressorId(Cow<'static, str>);

impl CompressorId {
    /// The built-in Zstandard compressor, the initial process-wide default.
    pub const ZSTD: CompressorId = CompressorId(Cow::Borrowed("zstd"));
    /// The built-in zlib/DEFLATE compressor.
    pub const DEFLATE: CompressorId = CompressorId(Cow::Borrowed("deflate"));
    /// The built-in XZ (LZMA2) compressor.
    pub const XZ: CompressorId = CompressorId(Cow::Borrowed("xz"));

    pub fn new(id: impl Into<String>) -> Self {
        CompressorId(Cow::Owned(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompressorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompressorId {
    fn from(id: &str) -> Self {
        CompressorId::new(id)
    }
}

impl From<String> for CompressorId {
    fn from(id: String) -> Self {
        CompressorId::new(id)
    }
}

//==================================================================================
// 2. Compressor Capability
//==================================================================================

/// A byte-level transform selectable per field.
///
/// **Contract:** `decompress(compress(b)) == b` for every byte sequence `b`,
/// including the empty one. Each call is independent of every other call, so a
/// stored payload can be decoded without out-of-band state. `compress` fails
/// only on unrecoverable resource conditions (`PackratError::Encode`);
/// `decompress` fails with `PackratError::Decode` on input it did not produce.
pub trait Compressor: Send + Sync + fmt::Debug {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, PackratError>;

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, PackratError>;
}
