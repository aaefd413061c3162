// In: src/schema/storage.rs

//! The storage-facing schema and its persisted forms.
//!
//! A `StorageSchema` is the ordered list of exported fields, each tagged with
//! its storage type and, for compressed fields, the compressor identity. It can
//! be persisted next to the data either as JSON or as an Arrow schema whose
//! field metadata carries the same information, so a later decode never has to
//! re-run analysis on a (possibly changed) source type.

use std::collections::HashMap;

use arrow_schema::{DataType, Field, Schema};
use serde::{Deserialize, Serialize};

use crate::compression::CompressorId;
use crate::error::PackratError;
use crate::schema::descriptor::FieldDescriptor;
use crate::types::StorageType;

/// Arrow field metadata key holding the field's `StorageType` tag.
pub const STORAGE_TYPE_METADATA_KEY: &str = "packrat.storage_type";
/// Arrow field metadata key holding the field's `CompressorId`, when compressed.
pub const COMPRESSOR_METADATA_KEY: &str = "packrat.compressor";
/// Arrow schema metadata key holding the source type name.
pub const TYPE_NAME_METADATA_KEY: &str = "packrat.type_name";

/// One exported field as the storage layer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub name: String,
    pub storage_type: StorageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressor: Option<CompressorId>,
}

impl SchemaEntry {
    /// The Arrow type of this entry's column: compressed payloads are opaque
    /// `Binary`, everything else keeps its native type.
    pub fn arrow_type(&self) -> DataType {
        if self.compressor.is_some() {
            DataType::Binary
        } else {
            self.storage_type.to_arrow_type()
        }
    }

    fn to_arrow_field(&self) -> Field {
        let mut metadata = HashMap::new();
        metadata.insert(
            STORAGE_TYPE_METADATA_KEY.to_string(),
            self.storage_type.to_string(),
        );
        if let Some(id) = &self.compressor {
            metadata.insert(COMPRESSOR_METADATA_KEY.to_string(), id.to_string());
        }
        Field::new(&self.name, self.arrow_type(), false).with_metadata(metadata)
    }

    fn from_arrow_field(field: &Field) -> Result<Self, PackratError> {
        let metadata = field.metadata();
        let compressor = metadata
            .get(COMPRESSOR_METADATA_KEY)
            .map(|id| CompressorId::new(id.as_str()));
        let storage_type = match metadata.get(STORAGE_TYPE_METADATA_KEY) {
            Some(tag) => tag.parse::<StorageType>()?,
            None if compressor.is_none() => StorageType::from_arrow_type(field.data_type())?,
            None => {
                return Err(PackratError::FieldMismatch(format!(
                    "compressed field '{}' is missing its '{}' metadata",
                    field.name(),
                    STORAGE_TYPE_METADATA_KEY
                )))
            }
        };

        let entry = SchemaEntry {
            name: field.name().clone(),
            storage_type,
            compressor,
        };
        if entry.arrow_type() != *field.data_type() {
            return Err(PackratError::FieldMismatch(format!(
                "field '{}' has Arrow type {:?}, expected {:?}",
                entry.name,
                field.data_type(),
                entry.arrow_type()
            )));
        }
        Ok(entry)
    }
}

/// The ordered storage schema of one type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageSchema {
    pub type_name: String,
    pub entries: Vec<SchemaEntry>,
}

impl StorageSchema {
    /// Builds the schema from analysed descriptors, keeping exported fields in order.
    pub fn from_descriptors(type_name: impl Into<String>, descriptors: &[FieldDescriptor]) -> Self {
        let entries = descriptors
            .iter()
            .filter(|d| d.exported)
            .map(|d| SchemaEntry {
                name: d.name.clone(),
                storage_type: d.declared_type,
                compressor: d.compressor.clone(),
            })
            .collect();
        Self {
            type_name: type_name.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// The distinct compressor identities referenced by this schema, sorted.
    pub fn compressors(&self) -> Vec<CompressorId> {
        let mut ids: Vec<_> = self
            .entries
            .iter()
            .filter_map(|e| e.compressor.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    //==============================================================================
    // Persisted forms
    //==============================================================================

    pub fn to_json(&self) -> Result<String, PackratError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PackratError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The Arrow schema of this storage schema, with per-field metadata.
    pub fn to_arrow_schema(&self) -> Schema {
        let fields: Vec<Field> = self.entries.iter().map(SchemaEntry::to_arrow_field).collect();
        let mut metadata = HashMap::new();
        metadata.insert(TYPE_NAME_METADATA_KEY.to_string(), self.type_name.clone());
        Schema::new_with_metadata(fields, metadata)
    }

    /// Reconstructs a storage schema from an Arrow schema produced by `to_arrow_schema`.
    pub fn from_arrow_schema(schema: &Schema) -> Result<Self, PackratError> {
        let type_name = schema
            .metadata()
            .get(TYPE_NAME_METADATA_KEY)
            .cloned()
            .unwrap_or_default();
        let entries = schema
            .fields()
            .iter()
            .map(|f| SchemaEntry::from_arrow_field(f))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { type_name, entries })
    }
}
