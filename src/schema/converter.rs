// In: src/schema/converter.rs

//! The Schema Converter: materializes a `StorageSchema` and moves instances in
//! and out of `StorageRecord`s, compressing and decompressing the fields the
//! schema marks.
//!
//! Data Flow (encode):
//!
//!   instance --write_fields--> FieldWriter --(per entry, schema order)--> compress? --> StorageRecord
//!
//! Data Flow (decode):
//!
//!   StorageRecord --shape check--> (per entry) decompress? --> FieldReader --read_fields--> instance
//!
//! Any failure aborts the whole call. `decode` never returns a partially
//! populated instance.

use hashbrown::HashSet;

use crate::compression::CompressorRegistry;
use crate::config::PackratConfig;
use crate::error::PackratError;
use crate::schema::analyser::StructAnalyser;
use crate::schema::codec::{FieldReader, FieldWriter};
use crate::schema::definition::StorageStruct;
use crate::schema::descriptor::FieldDescriptor;
use crate::schema::record::StorageRecord;
use crate::schema::storage::{SchemaEntry, StorageSchema};

/// Converts between instances and storage records under one schema.
#[derive(Debug, Clone)]
pub struct SchemaConverter<'r> {
    schema: StorageSchema,
    registry: &'r CompressorRegistry,
}

impl<'r> SchemaConverter<'r> {
    /// Builds the storage schema from analysed descriptors.
    pub fn new(
        type_name: impl Into<String>,
        descriptors: &[FieldDescriptor],
        registry: &'r CompressorRegistry,
    ) -> Self {
        Self::from_schema(StorageSchema::from_descriptors(type_name, descriptors), registry)
    }

    /// Analyses `T` under `config` and builds its converter.
    pub fn for_type<T: StorageStruct>(
        config: &PackratConfig,
        registry: &'r CompressorRegistry,
    ) -> Result<Self, PackratError> {
        let definition = T::definition();
        let descriptors = StructAnalyser::new(config).analyse(&definition)?;
        Ok(Self::new(definition.type_name, &descriptors, registry))
    }

    /// Wraps a previously persisted schema. No analysis is performed.
    pub fn from_schema(schema: StorageSchema, registry: &'r CompressorRegistry) -> Self {
        Self { schema, registry }
    }

    pub fn schema(&self) -> &StorageSchema {
        &self.schema
    }

    pub fn into_schema(self) -> StorageSchema {
        self.schema
    }

    //==============================================================================
    // Encode
    //==============================================================================

    /// Encodes `instance` into one cell per schema entry, in schema order.
    pub fn encode<T: StorageStruct>(&self, instance: &T) -> Result<StorageRecord, PackratError> {
        let mut writer = FieldWriter::new();
        instance.write_fields(&mut writer)?;

        let mut record = StorageRecord::new();
        for entry in &self.schema.entries {
            let (written_type, raw) = writer.take(&entry.name).ok_or_else(|| {
                PackratError::FieldMismatch(format!(
                    "{}: field '{}' is in the schema but was not written",
                    self.schema.type_name, entry.name
                ))
            })?;
            if written_type != entry.storage_type {
                return Err(PackratError::FieldMismatch(format!(
                    "{}: field '{}' was written as {} but the schema stores {}",
                    self.schema.type_name, entry.name, written_type, entry.storage_type
                )));
            }

            let stored = self.compress_entry(entry, raw)?;
            record.push(entry.name.clone(), stored);
        }

        let extra = writer.remaining();
        if !extra.is_empty() {
            return Err(PackratError::FieldMismatch(format!(
                "{}: fields {:?} were written but are not in the schema",
                self.schema.type_name, extra
            )));
        }

        Ok(record)
    }

    fn compress_entry(&self, entry: &SchemaEntry, raw: Vec<u8>) -> Result<Vec<u8>, PackratError> {
        let Some(id) = &entry.compressor else {
            return Ok(raw);
        };
        let compressor = self.registry.lookup(id)?;
        let compressed = compressor
            .compress(&raw)
            .map_err(|e| e.in_field(&entry.name))?;
        log_metric!(
            "event" = "compress_field",
            "field" = &entry.name,
            "compressor" = id,
            "raw_bytes" = raw.len(),
            "stored_bytes" = compressed.len()
        );
        Ok(compressed)
    }

    //==============================================================================
    // Decode
    //==============================================================================

    /// Decodes a record produced by `encode` under this schema.
    pub fn decode<T: StorageStruct>(&self, record: &StorageRecord) -> Result<T, PackratError> {
        self.check_shape(record)?;

        let mut reader = FieldReader::new();
        for entry in &self.schema.entries {
            let stored = record.get(&entry.name).ok_or_else(|| {
                PackratError::FieldMismatch(format!(
                    "{}: record has no cell for field '{}'",
                    self.schema.type_name, entry.name
                ))
            })?;
            let raw = self.decompress_entry(entry, stored)?;
            reader.insert(entry.name.clone(), entry.storage_type, raw);
        }

        T::read_fields(&mut reader)
    }

    fn decompress_entry(&self, entry: &SchemaEntry, stored: &[u8]) -> Result<Vec<u8>, PackratError> {
        let Some(id) = &entry.compressor else {
            return Ok(stored.to_vec());
        };
        let compressor = self.registry.lookup(id)?;
        let raw = compressor
            .decompress(stored)
            .map_err(|e| e.in_field(&entry.name))?;
        log::trace!(
            "packrat: {}.{} inflated {} -> {} bytes via '{}'",
            self.schema.type_name,
            entry.name,
            stored.len(),
            raw.len(),
            id
        );
        Ok(raw)
    }

    /// The record's cells must be exactly the schema's entries, each once.
    fn check_shape(&self, record: &StorageRecord) -> Result<(), PackratError> {
        let mut seen = HashSet::with_capacity(record.len());
        for cell in record.cells() {
            if !seen.insert(cell.name.as_str()) {
                return Err(PackratError::FieldMismatch(format!(
                    "{}: record contains field '{}' more than once",
                    self.schema.type_name, cell.name
                )));
            }
            if self.schema.entry(&cell.name).is_none() {
                return Err(PackratError::FieldMismatch(format!(
                    "{}: record contains field '{}' which is not in the schema",
                    self.schema.type_name, cell.name
                )));
            }
        }

        let missing: Vec<&str> = self
            .schema
            .entries
            .iter()
            .map(|e| e.name.as_str())
            .filter(|name| !seen.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(PackratError::FieldMismatch(format!(
                "{}: record is missing fields {:?}",
                self.schema.type_name, missing
            )));
        }
        Ok(())
    }
}
