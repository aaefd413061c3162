// In: src/schema/codec.rs

//! Typed access to a field's serialized byte form.
//!
//! `FieldCodec` defines the canonical bytes of every supported field type:
//! fixed-width numbers are little-endian, booleans are one byte (0 or 1),
//! strings are UTF-8 and byte vectors are stored as-is. These are the bytes a
//! compressor sees, and the bytes an uncompressed field is stored as.

use hashbrown::HashMap;

use crate::error::PackratError;
use crate::types::StorageType;

//==================================================================================
// 1. The Field Codec
//==================================================================================

/// A value type that can be stored in a field.
pub trait FieldCodec: Sized {
    const STORAGE_TYPE: StorageType;

    fn write_bytes(&self, out: &mut Vec<u8>);

    fn read_bytes(bytes: &[u8]) -> Result<Self, PackratError>;

    fn to_field_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_bytes(&mut out);
        out
    }
}

macro_rules! impl_fixed_width_codec {
    ($($t:ty => $storage:ident),+ $(,)?) => {
        $(
            impl FieldCodec for $t {
                const STORAGE_TYPE: StorageType = StorageType::$storage;

                fn write_bytes(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                fn read_bytes(bytes: &[u8]) -> Result<Self, PackratError> {
                    let array: [u8; std::mem::size_of::<$t>()] =
                        bytes.try_into().map_err(|_| PackratError::InvalidFieldBytes {
                            storage_type: StorageType::$storage,
                            reason: format!(
                                "expected {} bytes, got {}",
                                std::mem::size_of::<$t>(),
                                bytes.len()
                            ),
                        })?;
                    Ok(<$t>::from_le_bytes(array))
                }
            }
        )+
    };
}

impl_fixed_width_codec!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
);

impl FieldCodec for bool {
    const STORAGE_TYPE: StorageType = StorageType::Boolean;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(u8::from(*self));
    }

    fn read_bytes(bytes: &[u8]) -> Result<Self, PackratError> {
        match bytes {
            [0] => Ok(false),
            [1] => Ok(true),
            other => Err(PackratError::InvalidFieldBytes {
                storage_type: StorageType::Boolean,
                reason: format!("expected a single 0 or 1 byte, got {:?}", other),
            }),
        }
    }
}

impl FieldCodec for String {
    const STORAGE_TYPE: StorageType = StorageType::Utf8;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.as_bytes());
    }

    fn read_bytes(bytes: &[u8]) -> Result<Self, PackratError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| PackratError::InvalidFieldBytes {
            storage_type: StorageType::Utf8,
            reason: e.to_string(),
        })
    }
}

impl FieldCodec for Vec<u8> {
    const STORAGE_TYPE: StorageType = StorageType::Binary;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }

    fn read_bytes(bytes: &[u8]) -> Result<Self, PackratError> {
        Ok(bytes.to_vec())
    }
}

//==================================================================================
// 2. Writer & Reader
//==================================================================================

/// Collects the serialized fields of one instance, in the order they are put.
#[derive(Debug, Default)]
pub struct FieldWriter {
    fields: Vec<(String, StorageType, Vec<u8>)>,
}

impl FieldWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes `value` under `name`. A name may only be put once.
    pub fn put<T: FieldCodec>(&mut self, name: &str, value: &T) -> Result<(), PackratError> {
        if self.fields.iter().any(|(existing, _, _)| existing == name) {
            return Err(PackratError::FieldMismatch(format!(
                "field '{}' was written more than once",
                name
            )));
        }
        self.fields
            .push((name.to_string(), T::STORAGE_TYPE, value.to_field_bytes()));
        Ok(())
    }

    /// Removes and returns the bytes written under `name`.
    pub(crate) fn take(&mut self, name: &str) -> Option<(StorageType, Vec<u8>)> {
        let idx = self.fields.iter().position(|(existing, _, _)| existing == name)?;
        let (_, storage_type, bytes) = self.fields.remove(idx);
        Some((storage_type, bytes))
    }

    /// Names written but not yet taken.
    pub(crate) fn remaining(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _, _)| name.as_str()).collect()
    }
}

/// Hands decoded field bytes back to a `StorageStruct::read_fields` impl.
#[derive(Debug, Default)]
pub struct FieldReader {
    fields: HashMap<String, (StorageType, Vec<u8>)>,
}

impl FieldReader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: String, storage_type: StorageType, bytes: Vec<u8>) {
        self.fields.insert(name, (storage_type, bytes));
    }

    /// Deserializes the field `name` as `T`.
    ///
    /// Fails with `FieldMismatch` when the field is absent or its schema type
    /// is not `T`'s storage type.
    pub fn take<T: FieldCodec>(&mut self, name: &str) -> Result<T, PackratError> {
        let (storage_type, bytes) = self.fields.remove(name).ok_or_else(|| {
            PackratError::FieldMismatch(format!("field '{}' is not present in the record", name))
        })?;
        if storage_type != T::STORAGE_TYPE {
            return Err(PackratError::FieldMismatch(format!(
                "field '{}' is stored as {} but was read as {}",
                name,
                storage_type,
                T::STORAGE_TYPE
            )));
        }
        T::read_bytes(&bytes).map_err(|e| e.in_field(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_are_little_endian() {
        assert_eq!(7i64.to_field_bytes(), vec![7, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(0x0102u16.to_field_bytes(), vec![0x02, 0x01]);
        assert_eq!(i32::read_bytes(&(-5i32).to_le_bytes()).unwrap(), -5);
    }

    #[test]
    fn test_floats_and_bools_roundtrip() {
        let value = 3.5f64;
        assert_eq!(f64::read_bytes(&value.to_field_bytes()).unwrap(), value);
        assert!(bool::read_bytes(&true.to_field_bytes()).unwrap());
        assert!(!bool::read_bytes(&false.to_field_bytes()).unwrap());
    }

    #[test]
    fn test_wrong_width_is_rejected() {
        let result = i64::read_bytes(&[1, 2, 3]);
        assert!(matches!(
            result,
            Err(PackratError::InvalidFieldBytes { storage_type: StorageType::Int64, .. })
        ));
        assert!(bool::read_bytes(&[2]).is_err());
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let result = String::read_bytes(&[0xFF, 0xFE]);
        assert!(matches!(
            result,
            Err(PackratError::InvalidFieldBytes { storage_type: StorageType::Utf8, .. })
        ));
    }

    #[test]
    fn test_writer_rejects_duplicate_names() {
        let mut writer = FieldWriter::new();
        writer.put("id", &1i64).unwrap();
        assert!(matches!(writer.put("id", &2i64), Err(PackratError::FieldMismatch(_))));
    }

    #[test]
    fn test_reader_checks_storage_type() {
        let mut reader = FieldReader::new();
        reader.insert("id".to_string(), StorageType::Int64, 9i64.to_field_bytes());
        let result = reader.take::<i32>("id");
        assert!(matches!(result, Err(PackratError::FieldMismatch(_))));
    }

    #[test]
    fn test_reader_reports_missing_field() {
        let mut reader = FieldReader::new();
        assert!(matches!(reader.take::<String>("name"), Err(PackratError::FieldMismatch(_))));
    }
}
