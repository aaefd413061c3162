// In: src/config.rs

//! The single source of truth for all packrat configuration.
//!
//! `PackratConfig` is created once at the application boundary (e.g., from a
//! JSON document) and installed as the process-wide configuration with
//! [`init`]. After that it is read-only for the lifetime of the process: the
//! analyser reads the default compressor and the compress-by-default policy from
//! it, and the global registry derives the built-in compressor levels from it.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::compression::CompressorId;
use crate::error::PackratError;
use crate::kernels;

//==================================================================================
// I. Core Configuration Enums & Structs
//==================================================================================

/// Defines the trade-off between compression speed and stored size.
///
/// The profile picks the level of every built-in compressor unless an explicit
/// per-algorithm level overrides it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompressionProfile {
    /// Prioritizes speed over size.
    Fast,

    /// A balance between speed and size. This is the recommended default.
    #[default]
    Balanced,

    /// Prioritizes the smallest stored size at the cost of CPU time.
    HighCompression,
}

impl CompressionProfile {
    /// The zstd level this profile maps to.
    pub fn zstd_level(&self) -> i32 {
        match self {
            Self::Fast => 1,
            Self::Balanced => 3,
            Self::HighCompression => 19,
        }
    }

    /// The deflate level this profile maps to.
    pub fn deflate_level(&self) -> u32 {
        match self {
            Self::Fast => 1,
            Self::Balanced => 6,
            Self::HighCompression => 9,
        }
    }

    /// The xz preset this profile maps to.
    pub fn xz_level(&self) -> u32 {
        match self {
            Self::Fast => 1,
            Self::Balanced => kernels::xz::DEFAULT_LEVEL,
            Self::HighCompression => 9,
        }
    }
}

//==================================================================================
// II. The Unified PackratConfig
//==================================================================================

/// The unified configuration for struct analysis and schema conversion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PackratConfig {
    /// The compressor a `Compress` directive resolves to when it names none.
    #[serde(default = "default_compressor")]
    pub default_compressor: CompressorId,

    /// If true, exported variable-length fields without a directive are
    /// compressed with `default_compressor`.
    #[serde(default)]
    pub compress_by_default: bool,

    /// The primary profile guiding the built-in compressor levels.
    #[serde(default)]
    pub profile: CompressionProfile,

    /// Explicit zstd level, overriding the profile.
    #[serde(default)]
    pub zstd_level: Option<i32>,

    /// Explicit deflate level, overriding the profile.
    #[serde(default)]
    pub deflate_level: Option<u32>,

    /// Explicit xz preset, overriding the profile.
    #[serde(default)]
    pub xz_level: Option<u32>,
}

impl Default for PackratConfig {
    fn default() -> Self {
        Self {
            default_compressor: default_compressor(),
            compress_by_default: false,
            profile: CompressionProfile::default(),
            zstd_level: None,
            deflate_level: None,
            xz_level: None,
        }
    }
}

impl PackratConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, PackratError> {
        let config: PackratConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), PackratError> {
        if self.default_compressor.as_str().is_empty() {
            return Err(PackratError::Configuration(
                "default_compressor must not be empty".to_string(),
            ));
        }
        if let Some(level) = self.zstd_level {
            if !(kernels::zstd::MIN_LEVEL..=kernels::zstd::MAX_LEVEL).contains(&level) {
                return Err(PackratError::Configuration(format!(
                    "zstd_level must be within {}..={}, got {}",
                    kernels::zstd::MIN_LEVEL,
                    kernels::zstd::MAX_LEVEL,
                    level
                )));
            }
        }
        if let Some(level) = self.deflate_level {
            if level > kernels::deflate::MAX_LEVEL {
                return Err(PackratError::Configuration(format!(
                    "deflate_level must be within 0..={}, got {}",
                    kernels::deflate::MAX_LEVEL,
                    level
                )));
            }
        }
        if let Some(level) = self.xz_level {
            if level > kernels::xz::MAX_LEVEL {
                return Err(PackratError::Configuration(format!(
                    "xz_level must be within 0..={}, got {}",
                    kernels::xz::MAX_LEVEL,
                    level
                )));
            }
        }
        Ok(())
    }

    /// The effective zstd level.
    pub fn effective_zstd_level(&self) -> i32 {
        self.zstd_level.unwrap_or_else(|| self.profile.zstd_level())
    }

    /// The effective deflate level.
    pub fn effective_deflate_level(&self) -> u32 {
        self.deflate_level
            .unwrap_or_else(|| self.profile.deflate_level())
    }

    /// The effective xz preset.
    pub fn effective_xz_level(&self) -> u32 {
        self.xz_level.unwrap_or_else(|| self.profile.xz_level())
    }
}

/// Provides the default compressor identity for serde.
fn default_compressor() -> CompressorId {
    CompressorId::ZSTD
}

//==================================================================================
// III. Process-Wide Configuration
//==================================================================================

static GLOBAL_CONFIG: OnceCell<PackratConfig> = OnceCell::new();

/// Installs the process-wide configuration. Must be called at most once, before
/// any schema is built; a second call fails with `Configuration`.
pub fn init(config: PackratConfig) -> Result<(), PackratError> {
    config.validate()?;
    GLOBAL_CONFIG.set(config).map_err(|_| {
        PackratError::Configuration("the process-wide configuration is already initialized".to_string())
    })?;
    log::debug!("packrat: process-wide configuration installed");
    Ok(())
}

/// Returns the process-wide configuration, falling back to the defaults if
/// [`init`] was never called.
pub fn global() -> &'static PackratConfig {
    GLOBAL_CONFIG.get_or_init(PackratConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_zstd_balanced() {
        let config = PackratConfig::default();
        assert_eq!(config.default_compressor, CompressorId::ZSTD);
        assert!(!config.compress_by_default);
        assert_eq!(config.effective_zstd_level(), 3);
        assert_eq!(config.effective_deflate_level(), 6);
        assert_eq!(config.effective_xz_level(), 6);
    }

    #[test]
    fn test_empty_json_yields_defaults() {
        let config = PackratConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PackratConfig::default());
    }

    #[test]
    fn test_json_overrides_are_applied() {
        let config = PackratConfig::from_json_str(
            r#"{"default_compressor": "deflate", "compress_by_default": true, "profile": "high_compression", "deflate_level": 2}"#,
        )
        .unwrap();
        assert_eq!(config.default_compressor, CompressorId::DEFLATE);
        assert!(config.compress_by_default);
        assert_eq!(config.effective_zstd_level(), 19);
        assert_eq!(config.effective_deflate_level(), 2);
    }

    #[test]
    fn test_out_of_range_levels_are_rejected() {
        let result = PackratConfig::from_json_str(r#"{"zstd_level": 40}"#);
        assert!(matches!(result, Err(PackratError::Configuration(_))));

        let result = PackratConfig::from_json_str(r#"{"deflate_level": 12}"#);
        assert!(matches!(result, Err(PackratError::Configuration(_))));

        let result = PackratConfig::from_json_str(r#"{"xz_level": 10}"#);
        assert!(matches!(result, Err(PackratError::Configuration(_))));
    }

    #[test]
    fn test_empty_default_compressor_is_rejected() {
        let result = PackratConfig::from_json_str(r#"{"default_compressor": ""}"#);
        assert!(matches!(result, Err(PackratError::Configuration(_))));
    }

    #[test]
    fn test_malformed_json_surfaces_serde_error() {
        let result = PackratConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(PackratError::SerdeJson(_))));
    }
}
