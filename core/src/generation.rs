use crate::error::{IndexError, Result};
use crate::index::{
    CorpusMeta, DocId, Document, IdfTable, IndexArtifacts, InvertedIndex, Posting, Vocabulary,
};
use std::collections::HashSet;

/// One validated, immutable snapshot of the index artifacts.
///
/// Construction checks every cross-reference between the artifacts, so the
/// rankers can index the corpus by posting doc_id without bounds checks
/// failing at query time.
#[derive(Debug)]
pub struct Generation {
    artifacts: IndexArtifacts,
}

impl Generation {
    pub fn new(artifacts: IndexArtifacts) -> Result<Self> {
        validate(&artifacts)?;
        Ok(Self { artifacts })
    }

    pub fn corpus(&self) -> &[Document] { &self.artifacts.corpus }
    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.artifacts.corpus.get(doc_id as usize)
    }
    pub fn vocab(&self) -> &Vocabulary { &self.artifacts.vocab }
    pub fn inverted(&self) -> &InvertedIndex { &self.artifacts.inverted }
    pub fn idf_table(&self) -> &IdfTable { &self.artifacts.idf }
    pub fn meta(&self) -> &CorpusMeta { &self.artifacts.meta }

    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.artifacts.inverted.get(term).map(Vec::as_slice)
    }

    pub fn idf(&self, term: &str) -> f64 {
        self.artifacts.idf.get(term).copied().unwrap_or(0.0)
    }

    pub fn into_artifacts(self) -> IndexArtifacts { self.artifacts }
}

fn validate(a: &IndexArtifacts) -> Result<()> {
    let n = a.corpus.len();

    if a.meta.total_docs != n {
        return Err(IndexError::consistency(format!(
            "meta.total_docs is {} but corpus holds {n} documents",
            a.meta.total_docs
        )));
    }
    if a.meta.vocab_size != a.vocab.len() {
        return Err(IndexError::consistency(format!(
            "meta.vocab_size is {} but vocabulary holds {} terms",
            a.meta.vocab_size,
            a.vocab.len()
        )));
    }
    if !a.meta.avg_dl.is_finite() || a.meta.avg_dl < 0.0 {
        return Err(IndexError::consistency(format!("meta.avg_dl is {}", a.meta.avg_dl)));
    }

    for (doc_id, doc) in a.corpus.iter().enumerate() {
        if doc.length as usize != doc.tokens.len() {
            return Err(IndexError::consistency(format!(
                "document {doc_id} has length {} but {} tokens",
                doc.length,
                doc.tokens.len()
            )));
        }
    }

    for (term, &df) in &a.vocab {
        if df == 0 {
            return Err(IndexError::consistency(format!(
                "term {term:?} has document frequency 0"
            )));
        }
        if !a.inverted.contains_key(term) {
            return Err(IndexError::consistency(format!("term {term:?} has no posting list")));
        }
        if !a.idf.contains_key(term) {
            return Err(IndexError::consistency(format!("term {term:?} has no idf entry")));
        }
    }

    for (term, postings) in &a.inverted {
        if !a.vocab.contains_key(term) {
            return Err(IndexError::consistency(format!(
                "indexed term {term:?} missing from vocabulary"
            )));
        }
        let mut seen = HashSet::with_capacity(postings.len());
        for p in postings {
            if p.doc_id as usize >= n {
                return Err(IndexError::consistency(format!(
                    "posting for {term:?} references doc {} outside corpus of {n}",
                    p.doc_id
                )));
            }
            if p.tf == 0 {
                return Err(IndexError::consistency(format!(
                    "posting for {term:?} in doc {} has tf 0",
                    p.doc_id
                )));
            }
            if !seen.insert(p.doc_id) {
                return Err(IndexError::consistency(format!(
                    "doc {} listed twice for {term:?}",
                    p.doc_id
                )));
            }
        }
    }

    Ok(())
}
