use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type DocId = u32;

/// Upstream judge a problem was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Leetcode,
    Codeforces,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Leetcode => "leetcode",
            Source::Codeforces => "codeforces",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Input record for the index builder. `raw_text` is already assembled from
/// the upstream metadata (see [`crate::sources`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    pub title: String,
    pub url: String,
    pub source: Source,
    pub raw_text: String,
}

/// One corpus entry. Its doc_id is its position in the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub url: String,
    pub source: Source,
    pub tokens: Vec<String>,
    pub length: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    #[serde(rename = "doc")]
    pub doc_id: DocId,
    pub tf: u32,
}

/// term -> document frequency
pub type Vocabulary = HashMap<String, u32>;
/// term -> postings, in ascending doc_id order
pub type InvertedIndex = HashMap<String, Vec<Posting>>;
/// term -> inverse document frequency
pub type IdfTable = HashMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorpusMeta {
    pub total_docs: usize,
    pub avg_dl: f64,
    pub vocab_size: usize,
}

/// The five artifacts of one index build, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexArtifacts {
    pub corpus: Vec<Document>,
    pub vocab: Vocabulary,
    pub inverted: InvertedIndex,
    pub idf: IdfTable,
    pub meta: CorpusMeta,
}

impl Default for CorpusMeta {
    fn default() -> Self { Self { total_docs: 0, avg_dl: 0.0, vocab_size: 0 } }
}

/// Smoothed inverse document frequency, `ln((1 + n) / (1 + df))`.
pub fn idf(n: usize, df: u32) -> f64 {
    ((1.0 + n as f64) / (1.0 + df as f64)).ln()
}
