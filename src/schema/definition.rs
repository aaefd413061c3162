// In: src/schema/definition.rs

//! The static-introspection surface consumed by the `StructAnalyser`.
//!
//! Rust has no runtime reflection, so a storable type describes itself: it
//! returns a `StructDef` listing its fields in declaration order, each with its
//! declared storage type, its export flag and an optional `Compress` directive.
//! The same type then moves its field values through a `FieldWriter` and a
//! `FieldReader`.

use crate::compression::CompressorId;
use crate::error::PackratError;
use crate::schema::codec::{FieldCodec, FieldReader, FieldWriter};
use crate::schema::directive::Compress;
use crate::types::StorageType;

//==================================================================================
// 1. Field & Struct Definitions
//==================================================================================

/// One declared field of a storable type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub declared_type: StorageType,
    /// `false` when the field is excluded from the storage schema.
    pub exported: bool,
    pub directive: Option<Compress>,
}

impl FieldDef {
    /// An exported field whose storage type is taken from `T`.
    pub fn of<T: FieldCodec>(name: impl Into<String>) -> Self {
        Self::new(name, T::STORAGE_TYPE)
    }

    /// An exported field with an explicit storage type.
    pub fn new(name: impl Into<String>, declared_type: StorageType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            exported: true,
            directive: None,
        }
    }

    /// Attaches a `Compress` directive using the default compressor.
    pub fn compressed(self) -> Self {
        self.with_directive(Compress::default())
    }

    /// Attaches a `Compress` directive naming `compressor`.
    pub fn compressed_with(self, compressor: impl Into<CompressorId>) -> Self {
        self.with_directive(Compress::with(compressor))
    }

    pub fn with_directive(mut self, directive: Compress) -> Self {
        self.directive = Some(directive);
        self
    }

    /// Excludes the field from the storage schema.
    pub fn excluded(mut self) -> Self {
        self.exported = false;
        self
    }
}

/// The declared shape of a storable type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    pub type_name: String,
    pub fields: Vec<FieldDef>,
}

impl StructDef {
    pub fn builder(type_name: impl Into<String>) -> StructDefBuilder {
        StructDefBuilder {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }
}

/// Accumulates field definitions in declaration order.
#[derive(Debug)]
pub struct StructDefBuilder {
    type_name: String,
    fields: Vec<FieldDef>,
}

impl StructDefBuilder {
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Finishes the definition. Validation happens during analysis.
    pub fn build(self) -> StructDef {
        StructDef {
            type_name: self.type_name,
            fields: self.fields,
        }
    }
}

//==================================================================================
// 2. The Storable-Type Contract
//==================================================================================

/// A data structure whose storage schema can be derived.
///
/// **Contract:** `write_fields` must `put` every exported field named by
/// `definition`, using the declared type, and `read_fields` must `take` them
/// back. Excluded fields are neither written nor read; `read_fields` fills them
/// with whatever the type considers empty.
pub trait StorageStruct: Sized {
    fn definition() -> StructDef;

    fn write_fields(&self, writer: &mut FieldWriter) -> Result<(), PackratError>;

    fn read_fields(reader: &mut FieldReader) -> Result<Self, PackratError>;
}
