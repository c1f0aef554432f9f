use crate::index::{idf, CorpusMeta, DocId, Document, IndexArtifacts, Posting, RawDocument};
use crate::tokenizer::tokenize;
use std::collections::{HashMap, HashSet};

/// Build one generation of index artifacts from raw documents.
///
/// Document ids are positions in `docs`. An empty input yields empty
/// artifacts with `avg_dl == 0`.
pub fn build(docs: &[RawDocument]) -> IndexArtifacts {
    let mut out = IndexArtifacts::default();

    for raw in docs {
        let tokens = tokenize(&raw.raw_text);
        out.corpus.push(Document {
            title: raw.title.clone(),
            url: raw.url.clone(),
            source: raw.source,
            length: tokens.len() as u32,
            tokens,
        });
    }

    for (doc_id, doc) in out.corpus.iter().enumerate() {
        let doc_id = doc_id as DocId;

        let seen: HashSet<&str> = doc.tokens.iter().map(String::as_str).collect();
        for term in seen {
            *out.vocab.entry(term.to_string()).or_insert(0) += 1;
        }

        // Count in first-occurrence order so posting lists come out identical
        // for identical input.
        let mut order: Vec<&str> = Vec::new();
        let mut tf_counts: HashMap<&str, u32> = HashMap::new();
        for token in &doc.tokens {
            let count = tf_counts.entry(token.as_str()).or_insert(0);
            if *count == 0 {
                order.push(token.as_str());
            }
            *count += 1;
        }
        for term in order {
            let tf = tf_counts[term];
            out.inverted
                .entry(term.to_string())
                .or_default()
                .push(Posting { doc_id, tf });
        }
    }

    let n = out.corpus.len();
    out.idf = out.vocab.iter().map(|(term, &df)| (term.clone(), idf(n, df))).collect();

    let total_tokens: u64 = out.corpus.iter().map(|d| d.length as u64).sum();
    let avg_dl = if n > 0 { total_tokens as f64 / n as f64 } else { 0.0 };
    out.meta = CorpusMeta { total_docs: n, avg_dl, vocab_size: out.vocab.len() };

    tracing::info!(
        num_docs = n,
        vocab_size = out.meta.vocab_size,
        avg_dl,
        "built index generation"
    );
    out
}
