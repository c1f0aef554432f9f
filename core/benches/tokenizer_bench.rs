use algosearch_core::tokenizer::tokenize;
use algosearch_core::{build, Bm25Ranker, Generation, RawDocument, Ranker, Source, TfIdfRanker};
use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

const TEXT: &str =
    "Longest Substring Without Repeating Characters Hash Table String Sliding Window Medium";

fn corpus() -> Arc<Generation> {
    let tags = ["graphs", "dp", "greedy", "math", "binary search", "trees", "strings", "bitmasks"];
    let docs: Vec<RawDocument> = (0..5_000)
        .map(|i| RawDocument {
            title: format!("Problem {i}"),
            url: String::new(),
            source: Source::Codeforces,
            raw_text: format!(
                "problem {} {} {}",
                i,
                tags[i % tags.len()],
                tags[(i * 7) % tags.len()]
            ),
        })
        .collect();
    Arc::new(Generation::new(build(&docs)).expect("consistent generation"))
}

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_title", |b| b.iter(|| tokenize(TEXT)));
}

fn bench_rank(c: &mut Criterion) {
    let g = corpus();
    let q: Vec<String> = vec!["binary".into(), "search".into(), "greedy".into()];
    let tfidf = TfIdfRanker::new(g.clone());
    let bm25 = Bm25Ranker::new(g);
    c.bench_function("rank_tfidf", |b| b.iter(|| tfidf.rank(&q, 20)));
    c.bench_function("rank_bm25", |b| b.iter(|| bm25.rank(&q, 20)));
}

criterion_group!(benches, bench_tokenize, bench_rank);
criterion_main!(benches);
