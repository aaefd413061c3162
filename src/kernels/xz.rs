//! Stateless XZ (LZMA2) kernels built on `xz2`.
//!
//! Same frame layout as the other general-purpose kernels: an 8-byte
//! little-endian uncompressed length, then one complete `.xz` stream. The
//! stream's CRC64 check lets `decode` reject corrupted bodies.

use std::io::Write;

use xz2::read::XzDecoder;
use xz2::write::XzEncoder;

use crate::error::PackratError;
use crate::kernels::{read_declared, split_size_header, SIZE_HEADER_LEN};

pub const MAX_LEVEL: u32 = 9;

/// The preset most XZ tooling uses when none is given.
pub const DEFAULT_LEVEL: u32 = 6;

pub fn encode(input_bytes: &[u8], level: u32) -> Result<Vec<u8>, PackratError> {
    if input_bytes.is_empty() {
        return Ok(Vec::new());
    }

    let mut output_buf = Vec::with_capacity(SIZE_HEADER_LEN + input_bytes.len() / 2);
    output_buf.extend_from_slice(&(input_bytes.len() as u64).to_le_bytes());

    let mut encoder = XzEncoder::new(output_buf, level.min(MAX_LEVEL));
    encoder
        .write_all(input_bytes)
        .map_err(|e| PackratError::Encode(format!("xz: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| PackratError::Encode(format!("xz: {}", e)))
}

pub fn decode(input_bytes: &[u8]) -> Result<Vec<u8>, PackratError> {
    if input_bytes.is_empty() {
        return Ok(Vec::new());
    }

    let (uncompressed_len, compressed_data) = split_size_header(input_bytes, "xz")?;
    read_declared(XzDecoder::new(compressed_data), uncompressed_len, "xz")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xz_roundtrip_text() {
        let original = b"hello hello hello, packed by lzma2, hello hello hello".to_vec();
        let compressed = encode(&original, DEFAULT_LEVEL).unwrap();
        assert_eq!(&compressed[..SIZE_HEADER_LEN], &(original.len() as u64).to_le_bytes());
        assert_eq!(decode(&compressed).unwrap(), original);
    }

    #[test]
    fn test_xz_empty_input_is_empty_frame() {
        assert!(encode(&[], DEFAULT_LEVEL).unwrap().is_empty());
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_xz_understated_header_does_not_inflate_the_stream() {
        let mut frame = encode(&vec![0u8; 1 << 20], 1).unwrap();
        frame[..SIZE_HEADER_LEN].copy_from_slice(&1u64.to_le_bytes());
        let result = decode(&frame);
        assert!(matches!(result, Err(PackratError::Decode(ref msg)) if msg.contains("past the declared size")));
    }

    #[test]
    fn test_xz_rejects_garbage_body() {
        let mut bytes = 5u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"definitely not xz");
        assert!(matches!(decode(&bytes), Err(PackratError::Decode(_))));
    }
}
