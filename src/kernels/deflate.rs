//! Stateless zlib-wrapped DEFLATE kernels built on `flate2`.
//!
//! Frames share the zstd kernel's layout: an 8-byte little-endian uncompressed
//! length, then one complete zlib stream (whose Adler-32 trailer lets `decode`
//! reject corrupted bodies).

use std::io::Write;

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::PackratError;
use crate::kernels::{read_declared, split_size_header, SIZE_HEADER_LEN};

pub const MAX_LEVEL: u32 = 9;

pub fn encode(input_bytes: &[u8], level: u32) -> Result<Vec<u8>, PackratError> {
    if input_bytes.is_empty() {
        return Ok(Vec::new());
    }

    let mut output_buf = Vec::with_capacity(SIZE_HEADER_LEN + input_bytes.len() / 2);
    output_buf.extend_from_slice(&(input_bytes.len() as u64).to_le_bytes());

    let mut encoder = ZlibEncoder::new(output_buf, Compression::new(level.min(MAX_LEVEL)));
    encoder
        .write_all(input_bytes)
        .map_err(|e| PackratError::Encode(format!("deflate: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| PackratError::Encode(format!("deflate: {}", e)))
}

pub fn decode(input_bytes: &[u8]) -> Result<Vec<u8>, PackratError> {
    if input_bytes.is_empty() {
        return Ok(Vec::new());
    }

    let (uncompressed_len, compressed_data) = split_size_header(input_bytes, "deflate")?;

    read_declared(ZlibDecoder::new(compressed_data), uncompressed_len, "deflate")
}
