use super::Ranker;
use crate::error::{IndexError, Result};
use crate::generation::Generation;
use crate::index::Document;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Okapi BM25 tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Length-normalization strength.
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self { Self { k1: 1.5, b: 0.75 } }
}

impl Bm25Params {
    /// Checked constructor. With `k1 >= 0` and `b` in `[0, 1]` the
    /// denominator of [`bm25_contribution`] is at least `tf`, so scores stay finite.
    pub fn new(k1: f64, b: f64) -> Result<Self> {
        Ok(Self { k1: check_k1(k1)?, b: check_b(b)? })
    }
}

pub fn check_k1(k1: f64) -> Result<f64> {
    if k1.is_finite() && k1 >= 0.0 {
        Ok(k1)
    } else {
        Err(IndexError::InvalidParams(format!("k1 must be finite and >= 0, got {k1}")))
    }
}

pub fn check_b(b: f64) -> Result<f64> {
    if b.is_finite() && (0.0..=1.0).contains(&b) {
        Ok(b)
    } else {
        Err(IndexError::InvalidParams(format!("b must be within [0, 1], got {b}")))
    }
}

/// BM25 contribution of one term in one document:
/// `idf * tf * (k1 + 1) / (tf + k1 * (1 - b + b * dl / avg_dl))`.
///
/// With `avg_dl == 0` the length normalization factor is 1. For a fixed
/// document the value approaches `idf * (k1 + 1)` as `tf` grows.
pub fn bm25_contribution(
    idf: f64,
    tf: f64,
    doc_len: f64,
    avg_dl: f64,
    params: Bm25Params,
) -> f64 {
    let Bm25Params { k1, b } = params;
    let norm = if avg_dl > 0.0 { 1.0 - b + b * (doc_len / avg_dl) } else { 1.0 };
    idf * (tf * (k1 + 1.0)) / (tf + k1 * norm)
}

#[derive(Debug, Clone)]
pub struct Bm25Ranker {
    generation: Arc<Generation>,
    params: Bm25Params,
}

impl Bm25Ranker {
    pub fn new(generation: Arc<Generation>) -> Self {
        Self::with_params(generation, Bm25Params::default())
    }

    pub fn with_params(generation: Arc<Generation>, params: Bm25Params) -> Self {
        Self { generation, params }
    }

    pub fn params(&self) -> Bm25Params { self.params }
}

impl Ranker for Bm25Ranker {
    fn name(&self) -> &'static str { "bm25" }

    fn generation(&self) -> &Generation { &self.generation }

    fn posting_score(&self, doc: &Document, tf: u32, idf: f64) -> Option<f64> {
        let avg_dl = self.generation.meta().avg_dl;
        Some(bm25_contribution(idf, tf as f64, doc.length as f64, avg_dl, self.params))
    }
}
