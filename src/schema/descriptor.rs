use serde::{Deserialize, Serialize};

use crate::compression::CompressorId;
use crate::types::StorageType;

/// The analysed form of one declared field, produced by the `StructAnalyser`.
///
/// `compressor` is the resolved identity: `Some` exactly when the field is
/// exported and either carries a `Compress` directive or was picked up by the
/// compress-by-default policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub declared_type: StorageType,
    pub exported: bool,
    pub compressor: Option<CompressorId>,
}

impl FieldDescriptor {
    pub fn is_compressed(&self) -> bool {
        self.compressor.is_some()
    }
}
