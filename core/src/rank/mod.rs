//! Query-time scoring over one [`Generation`].
//!
//! Both models share the same skeleton: walk the posting list of every query
//! term, add a per-posting contribution to the document's running score, then
//! order by score (descending) and doc_id (ascending) and truncate.

mod bm25;
mod tfidf;

pub use bm25::{bm25_contribution, check_b, check_k1, Bm25Params, Bm25Ranker};
pub use tfidf::TfIdfRanker;

use crate::generation::Generation;
use crate::index::{DocId, Document, Source};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    pub title: String,
    pub url: String,
    pub source: Source,
}

/// A scoring model over the shared index artifacts.
///
/// Implementors only supply the per-posting contribution; accumulation,
/// ordering and truncation are provided by [`Ranker::rank`].
pub trait Ranker: Send + Sync {
    fn name(&self) -> &'static str;

    fn generation(&self) -> &Generation;

    /// Contribution of one posting of a query term. `None` skips the posting.
    fn posting_score(&self, doc: &Document, tf: u32, idf: f64) -> Option<f64>;

    fn rank(&self, query_terms: &[String], top_k: usize) -> Vec<SearchHit> {
        if top_k == 0 || query_terms.is_empty() {
            return Vec::new();
        }
        let gen = self.generation();
        let mut scores: HashMap<DocId, f64> = HashMap::new();
        for term in query_terms {
            let Some(postings) = gen.postings(term) else { continue };
            let idf = gen.idf(term);
            for p in postings {
                let Some(doc) = gen.document(p.doc_id) else { continue };
                if let Some(s) = self.posting_score(doc, p.tf, idf) {
                    *scores.entry(p.doc_id).or_insert(0.0) += s;
                }
            }
        }
        top_hits(gen, scores, top_k)
    }
}

fn top_hits(gen: &Generation, scores: HashMap<DocId, f64>, top_k: usize) -> Vec<SearchHit> {
    let mut scored: Vec<(DocId, f64)> = scores.into_iter().collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.truncate(top_k);
    scored
        .into_iter()
        .filter_map(|(doc_id, score)| {
            gen.document(doc_id).map(|d| SearchHit {
                doc_id,
                score,
                title: d.title.clone(),
                url: d.url.clone(),
                source: d.source,
            })
        })
        .collect()
}
