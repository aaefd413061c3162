//! Pure, stateless byte kernels.
//!
//! Kernels know nothing about schemas or registries: they take a byte slice and
//! return a new buffer or a `PackratError`. The `compression` module wraps the
//! general-purpose ones behind the `Compressor` trait, and the record framing
//! uses `leb128` for its length prefixes.

use std::io::Read;

use crate::error::PackratError;

pub mod deflate;
pub mod leb128;
pub mod xz;
pub mod zstd;

/// Length of the little-endian uncompressed-size header shared by the
/// general-purpose kernels.
pub(crate) const SIZE_HEADER_LEN: usize = 8;

/// Upper bound on the capacity reserved from an untrusted size header. (16MB)
pub(crate) const MAX_PREALLOCATION: usize = 16 * 1024 * 1024;

/// Splits a kernel frame into its declared uncompressed length and its body.
pub(crate) fn split_size_header<'a>(
    input_bytes: &'a [u8],
    kernel: &str,
) -> Result<(usize, &'a [u8]), PackratError> {
    if input_bytes.len() < SIZE_HEADER_LEN {
        return Err(PackratError::Decode(format!(
            "{}: input of {} bytes is too short to contain the size header",
            kernel,
            input_bytes.len()
        )));
    }
    let (header, body) = input_bytes.split_at(SIZE_HEADER_LEN);
    let mut len_bytes = [0u8; SIZE_HEADER_LEN];
    len_bytes.copy_from_slice(header);
    let declared = u64::from_le_bytes(len_bytes);
    let declared = usize::try_from(declared).map_err(|_| {
        PackratError::Decode(format!(
            "{}: declared size {} does not fit in memory",
            kernel, declared
        ))
    })?;
    Ok((declared, body))
}

/// Drains `decoder`, reading at most one byte past `declared_len` so an
/// understated header cannot make the kernel inflate an unbounded stream.
pub(crate) fn read_declared<R: Read>(
    decoder: R,
    declared_len: usize,
    kernel: &str,
) -> Result<Vec<u8>, PackratError> {
    let mut output = Vec::with_capacity(declared_len.min(MAX_PREALLOCATION));
    decoder
        .take((declared_len as u64).saturating_add(1))
        .read_to_end(&mut output)
        .map_err(|e| PackratError::Decode(format!("{}: {}", kernel, e)))?;

    if output.len() > declared_len {
        return Err(PackratError::Decode(format!(
            "{}: stream inflates past the declared size of {} bytes",
            kernel, declared_len
        )));
    }
    if output.len() != declared_len {
        return Err(PackratError::Decode(format!(
            "{}: decompressed size does not match header. Expected {}, got {}.",
            kernel,
            declared_len,
            output.len()
        )));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_frame_has_no_size_header() {
        assert!(matches!(
            split_size_header(&[1, 2, 3], "test"),
            Err(PackratError::Decode(ref msg)) if msg.contains("too short")
        ));
    }

    #[test]
    fn test_read_declared_stops_one_byte_past_header() {
        let endless = std::io::repeat(0xAB);
        let result = read_declared(endless, 4, "test");
        assert!(matches!(result, Err(PackratError::Decode(ref msg)) if msg.contains("past the declared size")));
    }

    #[test]
    fn test_read_declared_rejects_short_stream() {
        let result = read_declared(&[1u8, 2, 3][..], 5, "test");
        assert!(matches!(result, Err(PackratError::Decode(ref msg)) if msg.contains("Expected 5, got 3")));
        assert_eq!(read_declared(&[1u8, 2, 3][..], 3, "test").unwrap(), vec![1, 2, 3]);
    }
}
