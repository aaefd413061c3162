// In: src/bridge/stateless_api.rs

use crate::compression::registry;
use crate::config;
use crate::error::PackratError;
use crate::schema::{SchemaConverter, StorageRecord, StorageSchema, StorageStruct};

/// Derives the storage schema of `T` under the process-wide configuration.
pub fn build_schema<T: StorageStruct>() -> Result<StorageSchema, PackratError> {
    Ok(converter_for::<T>()?.into_schema())
}

/// A converter for `T` bound to the process-wide configuration and registry.
///
/// Callers converting many instances should hold on to the converter rather
/// than re-analysing `T` per call.
pub fn converter_for<T: StorageStruct>() -> Result<SchemaConverter<'static>, PackratError> {
    SchemaConverter::for_type::<T>(config::global(), registry::global())
}

/// Encodes `instance` and serializes the record to bytes.
pub fn encode_record<T: StorageStruct>(instance: &T) -> Result<Vec<u8>, PackratError> {
    // 1. Analyse the type and compress the marked fields.
    let record = converter_for::<T>()?.encode(instance)?;

    // 2. Frame the cells.
    record.to_bytes()
}

/// Parses bytes produced by `encode_record` and decodes them as `T`.
pub fn decode_record<T: StorageStruct>(bytes: &[u8]) -> Result<T, PackratError> {
    let record = StorageRecord::from_bytes(bytes)?;
    converter_for::<T>()?.decode(&record)
}
