//! Indexing and ranking core for the problem search engine.
//!
//! Raw problem records are tokenized and folded into one immutable
//! [`Generation`] of index artifacts, which the [`rank::Ranker`]
//! implementations (TF-IDF and BM25) score queries against.

pub mod builder;
pub mod engine;
pub mod error;
pub mod generation;
pub mod index;
pub mod persist;
pub mod rank;
pub mod sources;
pub mod tokenizer;

pub use builder::build;
pub use engine::SearchEngine;
pub use error::{IndexError, Result};
pub use generation::Generation;
pub use index::{
    CorpusMeta, DocId, Document, IdfTable, IndexArtifacts, InvertedIndex, Posting, RawDocument,
    Source, Vocabulary,
};
pub use rank::{Bm25Params, Bm25Ranker, Ranker, SearchHit, TfIdfRanker};
