// In: src/schema/mod.rs

//! Struct analysis and the compression-aware storage schema.
//!
//! Data flow:
//!
//! ```text
//!   StructDef --(StructAnalyser)--> [FieldDescriptor] --(StorageSchema)--> SchemaConverter
//!                                                                          |  encode / decode
//!                                                             StorageRecord <-> RecordBatch
//! ```

pub mod analyser;
pub mod batch;
pub mod codec;
pub mod converter;
pub mod definition;
pub mod descriptor;
pub mod directive;
pub mod record;
pub mod storage;

pub use analyser::StructAnalyser;
pub use codec::{FieldCodec, FieldReader, FieldWriter};
pub use converter::SchemaConverter;
pub use definition::{FieldDef, StorageStruct, StructDef, StructDefBuilder};
pub use descriptor::FieldDescriptor;
pub use directive::Compress;
pub use record::{RecordCell, StorageRecord};
pub use storage::{SchemaEntry, StorageSchema};
