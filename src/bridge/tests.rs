use super::*;
use crate::compression::{registry, Compressor, CompressorId};
use crate::error::PackratError;
use crate::schema::{FieldDef, FieldReader, FieldWriter, StorageRecord, StorageSchema, StorageStruct, StructDef};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct Article {
    id: i64,
    title: String,
    body: String,
    thumbnail: Vec<u8>,
    views: u32,
    cached_html: String,
}

impl StorageStruct for Article {
    fn definition() -> StructDef {
        StructDef::builder("Article")
            .field(FieldDef::of::<i64>("id"))
            .field(FieldDef::of::<String>("title"))
            .field(FieldDef::of::<String>("body").compressed())
            .field(FieldDef::of::<Vec<u8>>("thumbnail").compressed_with(CompressorId::DEFLATE))
            .field(FieldDef::of::<u32>("views"))
            .field(FieldDef::of::<String>("cached_html").excluded())
            .build()
    }

    fn write_fields(&self, writer: &mut FieldWriter) -> Result<(), PackratError> {
        writer.put("id", &self.id)?;
        writer.put("title", &self.title)?;
        writer.put("body", &self.body)?;
        writer.put("thumbnail", &self.thumbnail)?;
        writer.put("views", &self.views)
    }

    fn read_fields(reader: &mut FieldReader) -> Result<Self, PackratError> {
        Ok(Self {
            id: reader.take("id")?,
            title: reader.take("title")?,
            body: reader.take("body")?,
            thumbnail: reader.take("thumbnail")?,
            views: reader.take("views")?,
            cached_html: String::new(),
        })
    }
}

fn sample_article() -> Article {
    Article {
        id: 42,
        title: "Packing rats".to_string(),
        body: "lorem ipsum dolor sit amet ".repeat(200),
        thumbnail: (0..2048u32).map(|i| (i % 7) as u8).collect(),
        views: 1_000,
        cached_html: "<p>rendered</p>".to_string(),
    }
}

#[test]
fn test_record_roundtrip_through_bytes() {
    let article = sample_article();
    let bytes = encode_record(&article).unwrap();
    let decoded: Article = decode_record(&bytes).unwrap();

    // The excluded field is not stored, everything else survives.
    assert_eq!(decoded.cached_html, "");
    assert_eq!(
        decoded,
        Article {
            cached_html: String::new(),
            ..article
        }
    );
}

#[test]
fn test_compressed_fields_shrink_the_record() {
    let article = sample_article();
    let bytes = encode_record(&article).unwrap();
    let raw_size = article.body.len() + article.thumbnail.len();
    assert!(
        bytes.len() < raw_size / 4,
        "record of {} bytes for {} bytes of compressible payload",
        bytes.len(),
        raw_size
    );
}

#[test]
fn test_build_schema_reflects_directives() {
    let schema = build_schema::<Article>().unwrap();
    let names: Vec<_> = schema.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["id", "title", "body", "thumbnail", "views"]);
    assert_eq!(schema.entry("body").unwrap().compressor, Some(CompressorId::ZSTD));
    assert_eq!(schema.entry("thumbnail").unwrap().compressor, Some(CompressorId::DEFLATE));
    assert_eq!(schema.entry("title").unwrap().compressor, None);
}

#[test]
fn test_persisted_schema_decodes_without_reanalysis() {
    let article = sample_article();
    let converter = converter_for::<Article>().unwrap();
    let record = converter.encode(&article).unwrap();

    // Persist both the schema and the record, then decode from the persisted forms.
    let schema_json = converter.schema().to_json().unwrap();
    let record_bytes = record.to_bytes().unwrap();

    let schema = StorageSchema::from_json(&schema_json).unwrap();
    let restored = crate::schema::SchemaConverter::from_schema(schema, registry::global());
    let decoded: Article = restored
        .decode(&StorageRecord::from_bytes(&record_bytes).unwrap())
        .unwrap();
    assert_eq!(decoded.body, article.body);
    assert_eq!(decoded.thumbnail, article.thumbnail);
}

#[test]
fn test_custom_compressor_registered_globally() {
    #[derive(Debug)]
    struct XorCompressor(u8);

    impl Compressor for XorCompressor {
        fn compress(&self, input: &[u8]) -> Result<Vec<u8>, PackratError> {
            Ok(input.iter().map(|b| b ^ self.0).collect())
        }

        fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, PackratError> {
            self.compress(input)
        }
    }

    #[derive(Debug, PartialEq)]
    struct Secret {
        note: String,
    }

    impl StorageStruct for Secret {
        fn definition() -> StructDef {
            StructDef::builder("Secret")
                .field(FieldDef::of::<String>("note").compressed_with("bridge-test-xor"))
                .build()
        }

        fn write_fields(&self, writer: &mut FieldWriter) -> Result<(), PackratError> {
            writer.put("note", &self.note)
        }

        fn read_fields(reader: &mut FieldReader) -> Result<Self, PackratError> {
            Ok(Self {
                note: reader.take("note")?,
            })
        }
    }

    let secret = Secret {
        note: "meet at dawn".to_string(),
    };

    // Analysis succeeds before registration; encoding does not.
    assert!(build_schema::<Secret>().is_ok());
    assert!(matches!(
        encode_record(&secret),
        Err(PackratError::UnknownCompressor(_))
    ));

    registry::global()
        .register(CompressorId::new("bridge-test-xor"), Arc::new(XorCompressor(0x5A)))
        .unwrap();

    let bytes = encode_record(&secret).unwrap();
    assert!(!bytes.windows(secret.note.len()).any(|w| w == secret.note.as_bytes()));
    assert_eq!(decode_record::<Secret>(&bytes).unwrap(), secret);
}

#[test]
fn test_corrupt_record_bytes_are_rejected() {
    let mut bytes = encode_record(&sample_article()).unwrap();
    let last = bytes.len() - 1;
    bytes.truncate(last);
    assert!(decode_record::<Article>(&bytes).is_err());
    assert!(matches!(
        decode_record::<Article>(b"nope"),
        Err(PackratError::FrameFormatError(_))
    ));
}
