//! Long-lived query engine holding the active index generation.
//!
//! Lifecycle: construct once ([`SearchEngine::open`] or [`SearchEngine::new`]),
//! share by reference across query handlers, optionally [`swap`] or
//! [`reload`] a freshly built generation, drop on shutdown.
//!
//! [`swap`]: SearchEngine::swap
//! [`reload`]: SearchEngine::reload

use crate::error::{IndexError, Result};
use crate::generation::Generation;
use crate::persist::{load_generation, IndexPaths};
use crate::rank::{Bm25Params, Bm25Ranker, TfIdfRanker};
use parking_lot::RwLock;
use std::sync::Arc;

pub struct SearchEngine {
    paths: Option<IndexPaths>,
    current: RwLock<Arc<Generation>>,
    bm25: Bm25Params,
}

impl SearchEngine {
    pub fn new(generation: Generation) -> Self {
        Self {
            paths: None,
            current: RwLock::new(Arc::new(generation)),
            bm25: Bm25Params::default(),
        }
    }

    /// Load a generation from `paths`, failing if any artifact is missing,
    /// malformed or inconsistent.
    pub fn open(paths: IndexPaths) -> Result<Self> {
        let generation = load_generation(&paths)?;
        let meta = *generation.meta();
        tracing::info!(
            root = %paths.root.display(),
            total_docs = meta.total_docs,
            vocab_size = meta.vocab_size,
            "loaded index generation"
        );
        Ok(Self {
            paths: Some(paths),
            current: RwLock::new(Arc::new(generation)),
            bm25: Bm25Params::default(),
        })
    }

    /// Default BM25 parameters for [`SearchEngine::bm25`].
    pub fn with_bm25_params(mut self, params: Bm25Params) -> Self {
        self.bm25 = params;
        self
    }

    pub fn bm25_params(&self) -> Bm25Params { self.bm25 }

    /// Snapshot of the active generation. Holders keep it alive across swaps.
    pub fn generation(&self) -> Arc<Generation> { self.current.read().clone() }

    pub fn tfidf(&self) -> TfIdfRanker { TfIdfRanker::new(self.generation()) }

    pub fn bm25(&self) -> Bm25Ranker { self.bm25_with(self.bm25) }

    pub fn bm25_with(&self, params: Bm25Params) -> Bm25Ranker {
        Bm25Ranker::with_params(self.generation(), params)
    }

    /// Replace the active generation, returning the previous one.
    pub fn swap(&self, generation: Generation) -> Arc<Generation> {
        let total_docs = generation.meta().total_docs;
        let prev = std::mem::replace(&mut *self.current.write(), Arc::new(generation));
        tracing::info!(total_docs, "swapped index generation");
        prev
    }

    /// Re-read the generation from the directory the engine was opened from.
    /// On failure the active generation is left untouched.
    pub fn reload(&self) -> Result<Arc<Generation>> {
        let paths = self.paths.as_ref().ok_or(IndexError::Detached)?;
        let generation = load_generation(paths)?;
        Ok(self.swap(generation))
    }
}
