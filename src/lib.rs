//! This file is the root of the `packrat` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`schema`, `compression`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the types most callers need, so that `use packrat::*` style
//!     imports stay short.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[doc(hidden)]
pub use log as __log;

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod compression;
pub mod config;
pub mod error;
pub mod kernels;
pub mod logging;
pub mod schema;
pub mod types;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use compression::{Compressor, CompressorId, CompressorRegistry};
pub use config::{CompressionProfile, PackratConfig};
pub use error::PackratError;
pub use schema::{
    Compress, FieldCodec, FieldDef, FieldDescriptor, FieldReader, FieldWriter, SchemaConverter,
    StorageRecord, StorageSchema, StorageStruct, StructAnalyser, StructDef,
};
pub use types::StorageType;
