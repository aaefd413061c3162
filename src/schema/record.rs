// In: src/schema/record.rs

//! Defines the storage record produced by `SchemaConverter::encode` and its
//! self-describing byte form.
//!
//! On-disk layout:
//!
//! ```text
//! magic "PKRC" | version u16 LE | cell count (LEB128)
//!   then, per cell: name len (LEB128) | name (UTF-8) | payload len (LEB128) | payload
//! ```

use std::io::Cursor;

use crate::error::PackratError;
use crate::kernels::leb128;

//==================================================================================
// Format Constants
//==================================================================================

/// The magic number to identify a serialized storage record.
pub const RECORD_MAGIC: &[u8; 4] = b"PKRC";
/// The current version of the record format.
pub const RECORD_FORMAT_VERSION: u16 = 1;
/// A reasonable limit to prevent OOM attacks from malformed length prefixes. (16MB)
const MAX_REASONABLE_NAME_LEN: usize = 16 * 1024 * 1024;

//==================================================================================
// Public Structs
//==================================================================================

/// One named payload of a storage record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCell {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// An encoded instance: one cell per schema entry, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageRecord {
    cells: Vec<RecordCell>,
}

impl StorageRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.cells.push(RecordCell {
            name: name.into(),
            bytes,
        });
    }

    pub fn cells(&self) -> &[RecordCell] {
        &self.cells
    }

    /// The payload stored under `name`.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.cells
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.bytes.as_slice())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn into_cells(self) -> Vec<RecordCell> {
        self.cells
    }

    //==============================================================================
    // Serialization
    //==============================================================================

    /// Serializes the record. Cell order is preserved exactly.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PackratError> {
        let payload_size: usize = self.cells.iter().map(|c| c.name.len() + c.bytes.len()).sum();
        let mut buf = Vec::with_capacity(RECORD_MAGIC.len() + 2 + payload_size + 4 * self.cells.len() + 4);

        buf.extend_from_slice(RECORD_MAGIC);
        buf.extend_from_slice(&RECORD_FORMAT_VERSION.to_le_bytes());
        leb128::encode_one(self.cells.len() as u64, &mut buf)?;

        for cell in &self.cells {
            leb128::encode_one(cell.name.len() as u64, &mut buf)?;
            buf.extend_from_slice(cell.name.as_bytes());
            leb128::encode_one(cell.bytes.len() as u64, &mut buf)?;
            buf.extend_from_slice(&cell.bytes);
        }

        Ok(buf)
    }

    /// Deserializes a record written by `to_bytes`. Trailing bytes are an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PackratError> {
        let header_len = RECORD_MAGIC.len() + 2;
        if bytes.len() < header_len {
            return Err(PackratError::FrameFormatError(format!(
                "Record is too small to be valid. Minimum size: {}, got: {}",
                header_len,
                bytes.len()
            )));
        }
        if &bytes[..RECORD_MAGIC.len()] != RECORD_MAGIC {
            return Err(PackratError::FrameFormatError(
                "Invalid record magic number".into(),
            ));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != RECORD_FORMAT_VERSION {
            return Err(PackratError::FrameFormatError(format!(
                "Unsupported record version: expected {}, got {}",
                RECORD_FORMAT_VERSION, version
            )));
        }

        let mut cursor = Cursor::new(bytes);
        cursor.set_position(header_len as u64);

        let cell_count = read_len(&mut cursor, "cell count")?;
        // Every cell takes at least two bytes of length prefixes.
        if cell_count.saturating_mul(2) > bytes.len() - header_len {
            return Err(PackratError::FrameFormatError(format!(
                "Declared cell count {} exceeds record size",
                cell_count
            )));
        }

        let mut cells = Vec::with_capacity(cell_count);
        for _ in 0..cell_count {
            let name_len = read_len(&mut cursor, "name length")?;
            if name_len > MAX_REASONABLE_NAME_LEN {
                return Err(PackratError::FrameFormatError(format!(
                    "Cell name length {} exceeds limit",
                    name_len
                )));
            }
            let name_bytes = read_slice(&mut cursor, name_len)?;
            let name = String::from_utf8(name_bytes.to_vec())
                .map_err(|e| PackratError::FrameFormatError(format!("Invalid cell name: {}", e)))?;

            let payload_len = read_len(&mut cursor, "payload length")?;
            let payload = read_slice(&mut cursor, payload_len)?.to_vec();
            cells.push(RecordCell {
                name,
                bytes: payload,
            });
        }

        if cursor.position() as usize != bytes.len() {
            return Err(PackratError::FrameFormatError(
                "Trailing bytes after the last record cell".into(),
            ));
        }

        Ok(Self { cells })
    }
}

/// Reads a LEB128 length prefix as a `usize`.
fn read_len(cursor: &mut Cursor<&[u8]>, what: &str) -> Result<usize, PackratError> {
    let value = leb128::decode_one::<u64>(cursor)
        .map_err(|e| PackratError::FrameFormatError(format!("Failed to read {}: {}", what, e)))?;
    usize::try_from(value)
        .map_err(|_| PackratError::FrameFormatError(format!("{} {} does not fit in memory", what, value)))
}

/// Borrows the next `len` bytes and advances the cursor.
fn read_slice<'a>(cursor: &mut Cursor<&'a [u8]>, len: usize) -> Result<&'a [u8], PackratError> {
    let start = cursor.position() as usize;
    let bytes: &'a [u8] = *cursor.get_ref();
    let end = start
        .checked_add(len)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| {
            PackratError::FrameFormatError(format!(
                "Cell of {} bytes at offset {} runs past the end of the record",
                len, start
            ))
        })?;
    cursor.set_position(end as u64);
    Ok(&bytes[start..end])
}
