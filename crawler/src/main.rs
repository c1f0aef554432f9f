use anyhow::{Context, Result};
use algosearch_core::sources::{CODEFORCES_INDEX, LEETCODE_INDEX};
use clap::{Parser, Subcommand};
use reqwest::Client;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

mod codeforces;
mod leetcode;
mod retry;

use retry::RetryPolicy;

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Fetch LeetCode and Codeforces problem lists for indexing")]
struct Cli {
    #[command(subcommand)]
    source: Fetch,
    /// Directory receiving <src>_links.txt and <src>_index.json
    #[arg(long, global = true, default_value = "data")]
    out_dir: String,
    /// Attempts per request before giving up
    #[arg(long, global = true, default_value_t = 3)]
    max_retries: u32,
    /// Request timeout seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,
    /// User-Agent string
    #[arg(long, global = true, default_value = "algosearch-crawler/0.1")]
    user_agent: String,
}

#[derive(Subcommand, Debug)]
enum Fetch {
    /// LeetCode via GraphQL
    Leetcode {
        #[arg(long, default_value_t = 50)]
        batch_size: usize,
        /// Pause between pages in milliseconds
        #[arg(long, default_value_t = 500)]
        page_delay_ms: u64,
    },
    /// Codeforces via the REST API
    Codeforces,
    /// Both sources
    All {
        #[arg(long, default_value_t = 50)]
        batch_size: usize,
        #[arg(long, default_value_t = 500)]
        page_delay_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();
    let out_dir = Path::new(&args.out_dir);
    fs::create_dir_all(out_dir)?;

    let client = Client::builder()
        .user_agent(args.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;
    let policy = RetryPolicy { max_retries: args.max_retries, ..RetryPolicy::default() };

    let (lc, cf) = match args.source {
        Fetch::Leetcode { batch_size, page_delay_ms } => (Some((batch_size, page_delay_ms)), false),
        Fetch::Codeforces => (None, true),
        Fetch::All { batch_size, page_delay_ms } => (Some((batch_size, page_delay_ms)), true),
    };

    if let Some((batch_size, page_delay_ms)) = lc {
        let page_delay = Duration::from_millis(page_delay_ms);
        let problems =
            leetcode::fetch_all(&client, &policy, batch_size.max(1), page_delay).await?;
        let urls: Vec<String> = problems.iter().map(|p| p.url()).collect();
        save_listing(out_dir, "lc", &urls, &problems)?;
    }
    if cf {
        let problems = codeforces::fetch_all(&client, &policy).await?;
        let urls: Vec<String> = problems.iter().map(|p| p.url.clone()).collect();
        save_listing(out_dir, "cf", &urls, &problems)?;
    }
    Ok(())
}

/// Write `<prefix>_links.txt` and the problem metadata index.
fn save_listing<T: Serialize>(
    out_dir: &Path,
    prefix: &str,
    urls: &[String],
    problems: &[T],
) -> Result<()> {
    let links = out_dir.join(format!("{prefix}_links.txt"));
    let file = File::create(&links).with_context(|| format!("creating {}", links.display()))?;
    let mut out = BufWriter::new(file);
    for u in urls {
        writeln!(out, "{u}")?;
    }
    out.flush()?;

    let index_name = if prefix == "lc" { LEETCODE_INDEX } else { CODEFORCES_INDEX };
    let index = out_dir.join(index_name);
    let mut out = BufWriter::new(File::create(&index)?);
    serde_json::to_writer_pretty(&mut out, problems)?;
    out.flush()?;

    tracing::info!(
        count = problems.len(),
        links = %links.display(),
        index = %index.display(),
        "saved problem list"
    );
    Ok(())
}
