//! This module defines the canonical, type-safe storage type tag recorded for
//! every field of a storage schema.

use crate::error::PackratError;
use arrow_schema::DataType as ArrowDataType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The storage-facing type of a single field.
///
/// The tag is persisted with the schema (JSON and Arrow field metadata), so the
/// variant names are part of the public contract.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Utf8,
    Binary,
}

impl StorageType {
    /// Every storage type, in declaration order.
    pub const ALL: [StorageType; 13] = [
        Self::Boolean,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Float32,
        Self::Float64,
        Self::Utf8,
        Self::Binary,
    ];

    /// Converts an Arrow `DataType` into a `StorageType`.
    pub fn from_arrow_type(arrow_type: &ArrowDataType) -> Result<Self, PackratError> {
        match arrow_type {
            ArrowDataType::Boolean => Ok(Self::Boolean),
            ArrowDataType::Int8 => Ok(Self::Int8),
            ArrowDataType::Int16 => Ok(Self::Int16),
            ArrowDataType::Int32 => Ok(Self::Int32),
            ArrowDataType::Int64 => Ok(Self::Int64),
            ArrowDataType::UInt8 => Ok(Self::UInt8),
            ArrowDataType::UInt16 => Ok(Self::UInt16),
            ArrowDataType::UInt32 => Ok(Self::UInt32),
            ArrowDataType::UInt64 => Ok(Self::UInt64),
            ArrowDataType::Float32 => Ok(Self::Float32),
            ArrowDataType::Float64 => Ok(Self::Float64),
            ArrowDataType::Utf8 => Ok(Self::Utf8),
            ArrowDataType::Binary => Ok(Self::Binary),
            dt => Err(PackratError::UnsupportedType(format!(
                "Cannot convert Arrow type {:?} to StorageType",
                dt
            ))),
        }
    }

    /// Converts a `StorageType` back into an Arrow `DataType`.
    pub fn to_arrow_type(&self) -> ArrowDataType {
        match self {
            Self::Boolean => ArrowDataType::Boolean,
            Self::Int8 => ArrowDataType::Int8,
            Self::Int16 => ArrowDataType::Int16,
            Self::Int32 => ArrowDataType::Int32,
            Self::Int64 => ArrowDataType::Int64,
            Self::UInt8 => ArrowDataType::UInt8,
            Self::UInt16 => ArrowDataType::UInt16,
            Self::UInt32 => ArrowDataType::UInt32,
            Self::UInt64 => ArrowDataType::UInt64,
            Self::Float32 => ArrowDataType::Float32,
            Self::Float64 => ArrowDataType::Float64,
            Self::Utf8 => ArrowDataType::Utf8,
            Self::Binary => ArrowDataType::Binary,
        }
    }

    /// Returns the encoded width in bytes, or `None` for variable-length types.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            Self::Boolean | Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
            Self::Utf8 | Self::Binary => None,
        }
    }

    /// Returns `true` for byte/string-like payloads, the only types eligible
    /// for compress-by-default.
    pub fn is_variable_length(&self) -> bool {
        self.fixed_width().is_none()
    }
}

/// Provides the canonical string representation for a `StorageType`.
impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // These string representations are part of the public contract.
        write!(f, "{:?}", self)
    }
}

impl FromStr for StorageType {
    type Err = PackratError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.to_string() == tag)
            .ok_or_else(|| PackratError::UnsupportedType(format!("Unknown storage type tag '{}'", tag)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_mapping_is_bijective() {
        for storage_type in StorageType::ALL {
            let arrow_type = storage_type.to_arrow_type();
            assert_eq!(StorageType::from_arrow_type(&arrow_type).unwrap(), storage_type);
        }
    }

    #[test]
    fn test_unsupported_arrow_type_is_rejected() {
        let result = StorageType::from_arrow_type(&ArrowDataType::Date32);
        assert!(matches!(result, Err(PackratError::UnsupportedType(_))));
    }

    #[test]
    fn test_tag_round_trips_through_display() {
        for storage_type in StorageType::ALL {
            let tag = storage_type.to_string();
            assert_eq!(tag.parse::<StorageType>().unwrap(), storage_type);
        }
        assert!("Decimal".parse::<StorageType>().is_err());
    }

    #[test]
    fn test_only_utf8_and_binary_are_variable_length() {
        let variable: Vec<_> = StorageType::ALL
            .iter()
            .filter(|t| t.is_variable_length())
            .collect();
        assert_eq!(variable, vec![&StorageType::Utf8, &StorageType::Binary]);
    }
}
