//! Unsigned LEB128 varints, as used by the record framing for cell counts and
//! length prefixes.
//!
//! Values are widened to `u64` on the way out and narrowed back on the way in,
//! so every supported width shares one encoder and one decoder. A `u64` never
//! needs more than `MAX_ENCODED_LEN` bytes.

use std::io::Cursor;

use num_traits::{PrimInt, Unsigned};

use crate::error::PackratError;

/// Longest encoding of a `u64`: 64 bits in 7-bit groups.
pub const MAX_ENCODED_LEN: usize = 10;

const PAYLOAD_MASK: u8 = 0x7F;
const CONTINUATION: u8 = 0x80;

/// Appends the LEB128 encoding of `value` to `buffer`.
pub fn encode_one<T>(value: T, buffer: &mut Vec<u8>) -> Result<(), PackratError>
where
    T: PrimInt + Unsigned,
{
    let mut rest = value.to_u64().ok_or_else(|| {
        PackratError::Encode("leb128: value is wider than 64 bits".to_string())
    })?;

    while rest > u64::from(PAYLOAD_MASK) {
        buffer.push(((rest as u8) & PAYLOAD_MASK) | CONTINUATION);
        rest >>= 7;
    }
    buffer.push(rest as u8);
    Ok(())
}

/// Reads one LEB128 value at the cursor and advances past it.
///
/// Fails on a truncated sequence, on an encoding longer than
/// `MAX_ENCODED_LEN`, and on a value that does not fit in `T`.
pub fn decode_one<T>(cursor: &mut Cursor<&[u8]>) -> Result<T, PackratError>
where
    T: PrimInt + Unsigned,
{
    let start = cursor.position() as usize;
    let data: &[u8] = *cursor.get_ref();
    let bytes = data.get(start..).unwrap_or_default();

    let mut value: u64 = 0;
    for (i, &byte) in bytes.iter().take(MAX_ENCODED_LEN).enumerate() {
        let group = u64::from(byte & PAYLOAD_MASK);
        // The tenth group only has room for the top bit of a u64.
        if i == MAX_ENCODED_LEN - 1 && group > 1 {
            return Err(PackratError::Leb128DecodeError(
                "Integer overflow during decoding".to_string(),
            ));
        }
        value |= group << (7 * i);

        if byte & CONTINUATION == 0 {
            cursor.set_position((start + i + 1) as u64);
            return T::from(value).ok_or_else(|| {
                PackratError::Leb128DecodeError(format!(
                    "Integer overflow during decoding: {} does not fit in {} bytes",
                    value,
                    std::mem::size_of::<T>()
                ))
            });
        }
    }

    if bytes.len() >= MAX_ENCODED_LEN {
        Err(PackratError::Leb128DecodeError(format!(
            "Integer overflow during decoding: no terminator within {} bytes",
            MAX_ENCODED_LEN
        )))
    } else {
        Err(PackratError::Leb128DecodeError(
            "Unexpected end of buffer".to_string(),
        ))
    }
}
