// In: src/compression/registry.rs

//! The compressor registry: the only shared, long-lived state in the library.
//!
//! The registry is read-mostly. Lookups happen on every encode/decode of a
//! compressed field, while registration happens a handful of times at startup.
//! It is therefore copy-on-write: readers clone the current `Arc` snapshot
//! under a briefly-held read lock, and writers build a new map and publish it.
//! A reader never observes a half-updated map.

use std::sync::{Arc, PoisonError, RwLock};

use hashbrown::HashMap;
use once_cell::sync::Lazy;

use crate::compression::{
    Compressor, CompressorId, DeflateCompressor, XzCompressor, ZstdCompressor,
};
use crate::config::{self, PackratConfig};
use crate::error::PackratError;

type CompressorMap = HashMap<CompressorId, Arc<dyn Compressor>>;

/// Maps `CompressorId`s to implementations.
#[derive(Debug, Default)]
pub struct CompressorRegistry {
    current: RwLock<Arc<CompressorMap>>,
}

impl CompressorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in variants, configured from `config`.
    pub fn with_builtins(config: &PackratConfig) -> Self {
        let mut map = CompressorMap::new();
        map.insert(
            CompressorId::ZSTD,
            Arc::new(ZstdCompressor::new(config.effective_zstd_level())),
        );
        map.insert(
            CompressorId::DEFLATE,
            Arc::new(DeflateCompressor::new(config.effective_deflate_level())),
        );
        map.insert(
            CompressorId::XZ,
            Arc::new(XzCompressor::new(config.effective_xz_level())),
        );
        Self {
            current: RwLock::new(Arc::new(map)),
        }
    }

    /// Registers `compressor` under `id`. Identities are unique: registering an
    /// identity twice fails with `Configuration`.
    pub fn register(
        &self,
        id: CompressorId,
        compressor: Arc<dyn Compressor>,
    ) -> Result<(), PackratError> {
        if id.as_str().is_empty() {
            return Err(PackratError::Configuration(
                "compressor identity must not be empty".to_string(),
            ));
        }

        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if guard.contains_key(&id) {
            log::warn!("packrat: refusing to replace registered compressor '{}'", id);
            return Err(PackratError::Configuration(format!(
                "a compressor is already registered under '{}'",
                id
            )));
        }

        let mut next = (**guard).clone();
        next.insert(id.clone(), compressor);
        *guard = Arc::new(next);
        log::debug!("packrat: registered compressor '{}'", id);
        Ok(())
    }

    /// Removes the compressor registered under `id`, returning it.
    pub fn deregister(&self, id: &CompressorId) -> Option<Arc<dyn Compressor>> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if !guard.contains_key(id) {
            return None;
        }
        let mut next = (**guard).clone();
        let removed = next.remove(id);
        *guard = Arc::new(next);
        log::debug!("packrat: deregistered compressor '{}'", id);
        removed
    }

    /// Resolves `id`. Never falls back to another variant.
    pub fn lookup(&self, id: &CompressorId) -> Result<Arc<dyn Compressor>, PackratError> {
        self.snapshot()
            .get(id)
            .cloned()
            .ok_or_else(|| PackratError::UnknownCompressor(id.clone()))
    }

    pub fn contains(&self, id: &CompressorId) -> bool {
        self.snapshot().contains_key(id)
    }

    /// The registered identities, sorted.
    pub fn ids(&self) -> Vec<CompressorId> {
        let mut ids: Vec<_> = self.snapshot().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn snapshot(&self) -> Arc<CompressorMap> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }
}

static GLOBAL_REGISTRY: Lazy<CompressorRegistry> =
    Lazy::new(|| CompressorRegistry::with_builtins(config::global()));

/// The process-wide registry, populated with the built-ins on first use.
///
/// Built-in levels come from the process-wide configuration, so `config::init`
/// must run before the first call for a custom profile to take effect.
pub fn global() -> &'static CompressorRegistry {
    &GLOBAL_REGISTRY
}
