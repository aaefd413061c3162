//! This module contains the pure, stateless kernels for performing Zstandard
//! compression and decompression.
//!
//! Each call produces a complete, self-describing frame: an 8-byte little-endian
//! uncompressed length followed by one zstd frame. No dictionary or context is
//! retained between calls. This module is a safe, panic-free wrapper around the
//! `zstd` crate.

use crate::error::PackratError;
use crate::kernels::{read_declared, split_size_header, SIZE_HEADER_LEN};

/// The valid range of zstd compression levels accepted by `encode`.
pub const MIN_LEVEL: i32 = 1;
pub const MAX_LEVEL: i32 = 22;

//==================================================================================
// 1. Public API
//==================================================================================

/// Compresses `input_bytes` at the given level. Empty input encodes to an empty frame.
pub fn encode(input_bytes: &[u8], level: i32) -> Result<Vec<u8>, PackratError> {
    if input_bytes.is_empty() {
        return Ok(Vec::new());
    }

    let mut output_buf = Vec::with_capacity(SIZE_HEADER_LEN + input_bytes.len() / 2);

    // Prepend the uncompressed size so `decode` can verify the frame.
    let uncompressed_len: u64 = input_bytes.len() as u64;
    output_buf.extend_from_slice(&uncompressed_len.to_le_bytes());

    let mut encoder = zstd::stream::Encoder::new(&mut output_buf, level)
        .map_err(|e| PackratError::Encode(format!("zstd: {}", e)))?;
    std::io::Write::write_all(&mut encoder, input_bytes)
        .map_err(|e| PackratError::Encode(format!("zstd: {}", e)))?;
    // `finish` is essential to finalize the Zstd frame.
    encoder
        .finish()
        .map_err(|e| PackratError::Encode(format!("zstd: {}", e)))?;

    Ok(output_buf)
}

/// Decompresses a frame produced by `encode`.
pub fn decode(input_bytes: &[u8]) -> Result<Vec<u8>, PackratError> {
    if input_bytes.is_empty() {
        return Ok(Vec::new());
    }

    let (uncompressed_len, compressed_data) = split_size_header(input_bytes, "zstd")?;

    let decoder = zstd::stream::read::Decoder::new(compressed_data)
        .map_err(|e| PackratError::Decode(format!("zstd: {}", e)))?;
    read_declared(decoder, uncompressed_len, "zstd")
}

//==================================================================================
// 2. Unit Tests
//==================================================================================
