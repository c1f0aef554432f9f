use algosearch_core::persist::{load_generation, save_artifacts, IndexPaths};
use algosearch_core::sources::load_problems;
use algosearch_core::rank::{check_b, check_k1};
use algosearch_core::{
    build, Bm25Params, Bm25Ranker, RawDocument, Ranker, SearchHit, TfIdfRanker,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query the problem search index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    Tfidf,
    Bm25,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from fetched problem lists
    Build {
        /// Directory holding lc_index.json / cf_index.json
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Output index directory
        #[arg(long, default_value = "data")]
        output: PathBuf,
        /// Extra JSON/JSONL files of pre-assembled documents
        #[arg(long)]
        extra: Vec<PathBuf>,
    },
    /// Print corpus statistics of a built index
    Stats {
        #[arg(long, default_value = "data")]
        index: PathBuf,
    },
    /// Rank problems for a query from the command line
    Query {
        #[arg(long, default_value = "data")]
        index: PathBuf,
        #[arg(long, value_enum, default_value_t = Method::Bm25)]
        method: Method,
        #[arg(long, default_value_t = 20)]
        top_k: usize,
        /// BM25 term-frequency saturation (>= 0)
        #[arg(long, default_value_t = 1.5, value_parser = parse_k1)]
        k1: f64,
        /// BM25 length normalization, within [0, 1]
        #[arg(long, default_value_t = 0.75, value_parser = parse_b)]
        b: f64,
        /// Query words
        #[arg(required = true)]
        query: Vec<String>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { data_dir, output, extra } => build_index(&data_dir, &output, &extra),
        Commands::Stats { index } => {
            let generation = load_generation(&IndexPaths::new(&index))?;
            println!("{}", serde_json::to_string_pretty(generation.meta())?);
            Ok(())
        }
        Commands::Query { index, method, top_k, k1, b, query } => {
            let generation = Arc::new(load_generation(&IndexPaths::new(&index))?);
            let terms = query_terms(&query.join(" "));
            let hits = match method {
                Method::Tfidf => TfIdfRanker::new(generation).rank(&terms, top_k),
                Method::Bm25 => {
                    Bm25Ranker::with_params(generation, Bm25Params { k1, b }).rank(&terms, top_k)
                }
            };
            print_hits(&hits);
            Ok(())
        }
    }
}

fn parse_k1(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    check_k1(v).map_err(|e| e.to_string())
}

fn parse_b(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    check_b(v).map_err(|e| e.to_string())
}

/// Lowercase and whitespace-split raw user input.
fn query_terms(q: &str) -> Vec<String> {
    q.split_whitespace().map(str::to_lowercase).collect()
}

fn print_hits(hits: &[SearchHit]) {
    for (i, h) in hits.iter().enumerate() {
        println!("{}. [{}] {} (score: {:.6})", i + 1, h.source, h.title, h.score);
        println!("   {}", h.url);
    }
}

fn build_index(data_dir: &Path, output: &Path, extra: &[PathBuf]) -> Result<()> {
    let mut docs = load_problems(data_dir)?;
    for file in extra {
        let before = docs.len();
        read_documents(file, &mut docs)?;
        let added = docs.len() - before;
        tracing::info!(file = %file.display(), added, "loaded extra documents");
    }
    tracing::info!(num_docs = docs.len(), "ingested documents");

    let artifacts = build(&docs);
    let paths = IndexPaths::new(output);
    save_artifacts(&paths, &artifacts)
        .with_context(|| format!("writing index to {}", output.display()))?;

    tracing::info!(
        output = %output.display(),
        vocab_size = artifacts.meta.vocab_size,
        avg_dl = artifacts.meta.avg_dl,
        "index build complete"
    );
    Ok(())
}

/// Read pre-assembled documents from a JSON array, a single JSON object, or JSONL.
fn read_documents(file: &Path, docs: &mut Vec<RawDocument>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            docs.push(serde_json::from_str(&line)?);
        }
        return Ok(());
    }
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                docs.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => docs.push(serde_json::from_value(json)?),
        _ => bail!("{}: expected a document or an array of documents", file.display()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use algosearch_core::Source;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn query_terms_are_lowercased() {
        assert_eq!(query_terms("  Binary   SEARCH "), vec!["binary", "search"]);
    }

    #[test]
    fn bm25_flags_are_range_checked() {
        let query = |extra: &[&str]| {
            let mut argv = vec!["indexer", "query", "binary"];
            argv.extend_from_slice(extra);
            Cli::try_parse_from(argv)
        };
        assert!(query(&[]).is_ok());
        assert!(query(&["--k1", "0", "--b", "1"]).is_ok());
        assert!(query(&["--k1=-1"]).is_err());
        assert!(query(&["--k1", "NaN"]).is_err());
        assert!(query(&["--b", "1.5"]).is_err());
        assert!(query(&["--b=-0.25"]).is_err());

        let Commands::Query { k1, b, .. } = query(&["--k1", "2"]).unwrap().command else {
            panic!("expected query command");
        };
        assert_eq!((k1, b), (2.0, 0.75));
    }

    #[test]
    fn reads_jsonl_and_arrays() {
        let dir = tempdir().unwrap();
        let jsonl = dir.path().join("extra.jsonl");
        fs::write(
            &jsonl,
            "{\"title\":\"A\",\"url\":\"a\",\"source\":\"leetcode\",\"raw_text\":\"graph\"}\n\n{\"title\":\"B\",\"url\":\"b\",\"source\":\"codeforces\",\"raw_text\":\"tree\"}\n",
        )
        .unwrap();
        let array = dir.path().join("extra.json");
        let records = r#"[{"title":"C","url":"c","source":"codeforces","raw_text":"dp"}]"#;
        fs::write(&array, records).unwrap();

        let mut docs = Vec::new();
        read_documents(&jsonl, &mut docs).unwrap();
        read_documents(&array, &mut docs).unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[1].source, Source::Codeforces);
        assert_eq!(docs[2].title, "C");
    }

    #[test]
    fn builds_a_loadable_index() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("lc_index.json"),
            r#"[{"titleSlug":"two-sum","title":"Two Sum","difficulty":"Easy","topicTags":[{"name":"Array"}]}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("cf_index.json"),
            r#"[{"contestId":4,"index":"A","name":"Watermelon","tags":["math"],"url":"https://codeforces.com/problemset/problem/4/A"}]"#,
        )
        .unwrap();
        let out = dir.path().join("index");
        build_index(dir.path(), &out, &[]).unwrap();

        let g = load_generation(&IndexPaths::new(&out)).unwrap();
        assert_eq!(g.meta().total_docs, 2);
        assert_eq!(g.corpus()[0].tokens, vec!["two", "sum", "array", "easy"]);
        assert_eq!(g.corpus()[1].url, "https://codeforces.com/problemset/problem/4/A");
    }
}
