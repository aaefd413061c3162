//! The field-level compression directive.

use serde::{Deserialize, Serialize};

use crate::compression::CompressorId;

/// Marks a field for compression when its struct's storage schema is derived.
///
/// The directive is pure metadata: the `StructAnalyser` reads it once, resolves
/// it to a `CompressorId`, and the `SchemaConverter` applies that compressor to
/// the field's bytes on every encode/decode. It may only be attached to fields
/// that are exported to the schema.
///
/// When `compressor` is `None` the directive resolves to the process-wide
/// default compressor (`PackratConfig::default_compressor`, initially zstd).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Compress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressor: Option<CompressorId>,
}

impl Compress {
    /// A directive naming a specific compressor.
    pub fn with(compressor: impl Into<CompressorId>) -> Self {
        Self {
            compressor: Some(compressor.into()),
        }
    }

    /// Resolves the directive against the configured default.
    pub fn resolve(&self, default: &CompressorId) -> CompressorId {
        self.compressor.clone().unwrap_or_else(|| default.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_resolves_to_default() {
        assert_eq!(Compress::default().resolve(&CompressorId::ZSTD), CompressorId::ZSTD);
    }

    #[test]
    fn test_explicit_directive_wins_over_default() {
        let directive = Compress::with(CompressorId::DEFLATE);
        assert_eq!(directive.resolve(&CompressorId::ZSTD), CompressorId::DEFLATE);
    }
}
