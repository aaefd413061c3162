//! The built-in compressor variants. Both are thin, stateless adapters over the
//! pure kernels in `crate::kernels`.

use crate::compression::Compressor;
use crate::config::CompressionProfile;
use crate::error::PackratError;
use crate::kernels;

/// The default compressor: Zstandard at a configurable level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZstdCompressor {
    level: i32,
}

impl ZstdCompressor {
    /// Creates a compressor at `level`, clamped into the range zstd accepts.
    pub fn new(level: i32) -> Self {
        Self {
            level: level.clamp(kernels::zstd::MIN_LEVEL, kernels::zstd::MAX_LEVEL),
        }
    }

    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Default for ZstdCompressor {
    fn default() -> Self {
        Self::new(CompressionProfile::default().zstd_level())
    }
}

impl Compressor for ZstdCompressor {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, PackratError> {
        kernels::zstd::encode(input, self.level)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, PackratError> {
        kernels::zstd::decode(input)
    }
}

/// zlib-wrapped DEFLATE at a configurable level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeflateCompressor {
    level: u32,
}

impl DeflateCompressor {
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(kernels::deflate::MAX_LEVEL),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Default for DeflateCompressor {
    fn default() -> Self {
        Self::new(CompressionProfile::default().deflate_level())
    }
}

impl Compressor for DeflateCompressor {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, PackratError> {
        kernels::deflate::encode(input, self.level)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, PackratError> {
        kernels::deflate::decode(input)
    }
}

/// XZ (LZMA2) at a configurable preset. Slower than zstd, usually smaller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XzCompressor {
    level: u32,
}

impl XzCompressor {
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(kernels::xz::MAX_LEVEL),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Default for XzCompressor {
    fn default() -> Self {
        Self::new(CompressionProfile::default().xz_level())
    }
}

impl Compressor for XzCompressor {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, PackratError> {
        kernels::xz::encode(input, self.level)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, PackratError> {
        kernels::xz::decode(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn builtins() -> Vec<Box<dyn Compressor>> {
        vec![
            Box::new(ZstdCompressor::default()),
            Box::new(ZstdCompressor::new(19)),
            Box::new(DeflateCompressor::default()),
            Box::new(DeflateCompressor::new(1)),
            Box::new(XzCompressor::default()),
        ]
    }

    #[test]
    fn test_builtins_roundtrip_arbitrary_bytes() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for compressor in builtins() {
            for _ in 0..32 {
                let len = rng.random_range(0..4096usize);
                let mut input = vec![0u8; len];
                rng.fill(&mut input[..]);
                let compressed = compressor.compress(&input).unwrap();
                assert_eq!(
                    compressor.decompress(&compressed).unwrap(),
                    input,
                    "round trip failed for {:?} with {} bytes",
                    compressor,
                    len
                );
            }
        }
    }

    #[test]
    fn test_builtins_roundtrip_empty_input() {
        for compressor in builtins() {
            let compressed = compressor.compress(&[]).unwrap();
            assert!(compressor.decompress(&compressed).unwrap().is_empty());
        }
    }

    #[test]
    fn test_builtins_are_stateless_across_calls() {
        let compressor = ZstdCompressor::default();
        let first = compressor.compress(b"alpha alpha alpha").unwrap();
        compressor.compress(b"unrelated payload in between").unwrap();
        let second = compressor.compress(b"alpha alpha alpha").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_cross_variant_payload_is_rejected() {
        let zstd_payload = ZstdCompressor::default().compress(&[9u8; 512]).unwrap();
        let result = DeflateCompressor::default().decompress(&zstd_payload);
        assert!(matches!(result, Err(PackratError::Decode(_))));
    }

    #[test]
    fn test_levels_are_clamped() {
        assert_eq!(ZstdCompressor::new(99).level(), kernels::zstd::MAX_LEVEL);
        assert_eq!(ZstdCompressor::new(-5).level(), kernels::zstd::MIN_LEVEL);
        assert_eq!(DeflateCompressor::new(42).level(), kernels::deflate::MAX_LEVEL);
        assert_eq!(XzCompressor::new(42).level(), kernels::xz::MAX_LEVEL);
        assert_eq!(XzCompressor::default().level(), 6);
    }
}
