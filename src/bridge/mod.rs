// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the one-call public API of the packrat library. It binds the
// schema engine to the process-wide configuration and compressor registry, so a
// caller holding a `StorageStruct` never has to construct either.
//
// Data Flow (Encode):
//
//   1. [Stateless API (encode_record)]  -> Receives `&T`
//         |
//         `-> a. `converter_for::<T>()`: analyse `T` under `config::global()`
//         |
//         `-> b. `SchemaConverter::encode` against `registry::global()`
//
//   2. [StorageRecord::to_bytes]         -> Returns `Vec<u8>` (a self-describing record)
//
//
// Data Flow (Decode):
//
//   1. [StorageRecord::from_bytes]       -> Receives `&[u8]`
//         |
//         `-> Returns the named cells, in stored order
//
//   2. [Stateless API (decode_record)]   -> `SchemaConverter::decode` -> `T`
//
// ====================================================================================
pub mod stateless_api;

pub use stateless_api::{build_schema, converter_for, decode_record, encode_record};

#[cfg(test)]
mod tests;
