use algosearch_core::persist::IndexPaths;
use algosearch_core::rank::{check_b, check_k1};
use algosearch_core::{Bm25Params, SearchEngine};
use anyhow::Result;
use clap::Parser;
use server::build_app_with;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Index directory path
    #[arg(long, default_value = "./data")]
    index: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Default BM25 term-frequency saturation (>= 0)
    #[arg(long, default_value_t = 1.5, value_parser = parse_k1)]
    k1: f64,
    /// Default BM25 length normalization, within [0, 1]
    #[arg(long, default_value_t = 0.75, value_parser = parse_b)]
    b: f64,
}

fn parse_k1(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    check_k1(v).map_err(|e| e.to_string())
}

fn parse_b(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    check_b(v).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let engine = SearchEngine::open(IndexPaths::new(&args.index))?
        .with_bm25_params(Bm25Params { k1: args.k1, b: args.b });
    let app = build_app_with(Arc::new(engine), std::env::var("ADMIN_TOKEN").ok());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, index = %args.index, "serving search");
    axum::serve(listener, app).await?;
    Ok(())
}
