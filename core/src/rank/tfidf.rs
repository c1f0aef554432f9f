use super::Ranker;
use crate::generation::Generation;
use crate::index::Document;
use std::sync::Arc;

/// Length-normalized TF-IDF: sum over query terms of `(tf / length) * idf`.
#[derive(Debug, Clone)]
pub struct TfIdfRanker {
    generation: Arc<Generation>,
}

impl TfIdfRanker {
    pub fn new(generation: Arc<Generation>) -> Self { Self { generation } }
}

impl Ranker for TfIdfRanker {
    fn name(&self) -> &'static str { "tfidf" }

    fn generation(&self) -> &Generation { &self.generation }

    fn posting_score(&self, doc: &Document, tf: u32, idf: f64) -> Option<f64> {
        if doc.length == 0 {
            return None;
        }
        Some((tf as f64 / doc.length as f64) * idf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Source;

    fn doc(length: u32) -> Document {
        Document {
            title: String::new(),
            url: String::new(),
            source: Source::Leetcode,
            tokens: vec!["x".into(); length as usize],
            length,
        }
    }

    #[test]
    fn normalizes_by_length_and_skips_empty_docs() {
        let r = TfIdfRanker::new(Arc::new(Generation::new(Default::default()).unwrap()));
        assert_eq!(r.posting_score(&doc(4), 2, 3.0), Some(1.5));
        assert_eq!(r.posting_score(&doc(0), 1, 3.0), None);
    }
}
