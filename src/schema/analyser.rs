// In: src/schema/analyser.rs

//! The Struct Analyser: turns a type's declared fields into `FieldDescriptor`s.
//!
//! Analysis is a single synchronous pass over the `StructDef` in declaration
//! order. It resolves each `Compress` directive to exactly one
//! `CompressorId`, applies the compress-by-default policy, and rejects
//! directives that could never take effect. It does not consult the
//! compressor registry: an identity only has to be registered by the time a
//! record is encoded or decoded.

use hashbrown::HashSet;

use crate::config::PackratConfig;
use crate::error::PackratError;
use crate::schema::definition::{FieldDef, StorageStruct, StructDef};
use crate::schema::descriptor::FieldDescriptor;

/// Derives field descriptors under a fixed configuration.
#[derive(Debug, Clone, Copy)]
pub struct StructAnalyser<'c> {
    config: &'c PackratConfig,
}

impl<'c> StructAnalyser<'c> {
    pub fn new(config: &'c PackratConfig) -> Self {
        Self { config }
    }

    /// Analyses the definition of `T`.
    pub fn analyse_type<T: StorageStruct>(&self) -> Result<Vec<FieldDescriptor>, PackratError> {
        self.analyse(&T::definition())
    }

    /// Produces one descriptor per declared field, preserving declaration order.
    pub fn analyse(&self, def: &StructDef) -> Result<Vec<FieldDescriptor>, PackratError> {
        let mut seen = HashSet::with_capacity(def.fields.len());
        let mut descriptors = Vec::with_capacity(def.fields.len());

        for field in &def.fields {
            if field.name.is_empty() {
                return Err(PackratError::Configuration(format!(
                    "{}: field names must not be empty",
                    def.type_name
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(PackratError::Configuration(format!(
                    "{}: field '{}' is declared more than once",
                    def.type_name, field.name
                )));
            }

            let descriptor = self.analyse_field(&def.type_name, field)?;
            log::trace!(
                "packrat: {}.{} -> exported={} compressor={:?}",
                def.type_name,
                descriptor.name,
                descriptor.exported,
                descriptor.compressor.as_ref().map(|id| id.as_str())
            );
            descriptors.push(descriptor);
        }

        log::debug!(
            "packrat: analysed {} ({} fields, {} compressed)",
            def.type_name,
            descriptors.len(),
            descriptors.iter().filter(|d| d.is_compressed()).count()
        );
        Ok(descriptors)
    }

    fn analyse_field(&self, type_name: &str, field: &FieldDef) -> Result<FieldDescriptor, PackratError> {
        let compressor = match (&field.directive, field.exported) {
            (Some(_), false) => {
                return Err(PackratError::Configuration(format!(
                    "{}: field '{}' is excluded from the schema but carries a Compress directive",
                    type_name, field.name
                )));
            }
            (Some(directive), true) => {
                if matches!(&directive.compressor, Some(id) if id.as_str().is_empty()) {
                    return Err(PackratError::Configuration(format!(
                        "{}: field '{}' names an empty compressor identity",
                        type_name, field.name
                    )));
                }
                Some(directive.resolve(&self.config.default_compressor))
            }
            (None, true)
                if self.config.compress_by_default && field.declared_type.is_variable_length() =>
            {
                Some(self.config.default_compressor.clone())
            }
            (None, _) => None,
        };

        Ok(FieldDescriptor {
            name: field.name.clone(),
            declared_type: field.declared_type,
            exported: field.exported,
            compressor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::CompressorId;
    use crate::schema::definition::FieldDef;
    use crate::types::StorageType;

    fn event_def() -> StructDef {
        StructDef::builder("Event")
            .field(FieldDef::of::<i64>("id"))
            .field(FieldDef::of::<Vec<u8>>("payload").compressed())
            .field(FieldDef::of::<String>("note").compressed_with(CompressorId::DEFLATE))
            .field(FieldDef::of::<String>("label"))
            .field(FieldDef::of::<String>("scratch").excluded())
            .build()
    }

    #[test]
    fn test_directives_resolve_explicit_and_default() {
        let config = PackratConfig::default();
        let descriptors = StructAnalyser::new(&config).analyse(&event_def()).unwrap();

        assert_eq!(descriptors.len(), 5);
        assert_eq!(descriptors[0].compressor, None);
        assert_eq!(descriptors[1].compressor, Some(CompressorId::ZSTD));
        assert_eq!(descriptors[2].compressor, Some(CompressorId::DEFLATE));
        assert_eq!(descriptors[3].compressor, None);
        assert!(!descriptors[4].exported);
        assert_eq!(descriptors[4].compressor, None);
    }

    #[test]
    fn test_default_directive_follows_configured_default() {
        let config = PackratConfig {
            default_compressor: CompressorId::DEFLATE,
            ..PackratConfig::default()
        };
        let descriptors = StructAnalyser::new(&config).analyse(&event_def()).unwrap();
        assert_eq!(descriptors[1].compressor, Some(CompressorId::DEFLATE));
    }

    #[test]
    fn test_compress_by_default_only_touches_variable_length_exported_fields() {
        let config = PackratConfig {
            compress_by_default: true,
            ..PackratConfig::default()
        };
        let descriptors = StructAnalyser::new(&config).analyse(&event_def()).unwrap();

        assert_eq!(descriptors[0].compressor, None, "integers are never compressed by default");
        assert_eq!(descriptors[3].compressor, Some(CompressorId::ZSTD));
        assert_eq!(descriptors[4].compressor, None, "excluded fields stay uncompressed");
    }

    #[test]
    fn test_directive_on_excluded_field_is_a_configuration_error() {
        let def = StructDef::builder("Broken")
            .field(FieldDef::new("secret", StorageType::Binary).compressed().excluded())
            .build();
        let config = PackratConfig::default();
        let result = StructAnalyser::new(&config).analyse(&def);
        assert!(matches!(result, Err(PackratError::Configuration(ref msg)) if msg.contains("secret")));
    }

    #[test]
    fn test_duplicate_and_empty_names_are_rejected() {
        let config = PackratConfig::default();
        let analyser = StructAnalyser::new(&config);

        let duplicate = StructDef::builder("Dup")
            .field(FieldDef::of::<i32>("a"))
            .field(FieldDef::of::<i64>("a"))
            .build();
        assert!(matches!(analyser.analyse(&duplicate), Err(PackratError::Configuration(_))));

        let empty = StructDef::builder("Empty").field(FieldDef::of::<i32>("")).build();
        assert!(matches!(analyser.analyse(&empty), Err(PackratError::Configuration(_))));
    }

    #[test]
    fn test_empty_compressor_identity_is_rejected() {
        let def = StructDef::builder("Blank")
            .field(FieldDef::of::<String>("body").compressed_with(""))
            .build();
        let config = PackratConfig::default();
        assert!(matches!(
            StructAnalyser::new(&config).analyse(&def),
            Err(PackratError::Configuration(_))
        ));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let config = PackratConfig {
            compress_by_default: true,
            ..PackratConfig::default()
        };
        let analyser = StructAnalyser::new(&config);
        let first = analyser.analyse(&event_def()).unwrap();
        for _ in 0..10 {
            assert_eq!(analyser.analyse(&event_def()).unwrap(), first);
        }
    }

    #[test]
    fn test_unregistered_identity_is_accepted_at_analysis_time() {
        let def = StructDef::builder("Later")
            .field(FieldDef::of::<Vec<u8>>("blob").compressed_with("registered-later"))
            .build();
        let config = PackratConfig::default();
        let descriptors = StructAnalyser::new(&config).analyse(&def).unwrap();
        assert_eq!(descriptors[0].compressor, Some(CompressorId::new("registered-later")));
    }
}
