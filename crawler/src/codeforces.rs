//! Codeforces problem list via the public REST API.

use crate::retry::RetryPolicy;
use algosearch_core::sources::CodeforcesProblem;
use anyhow::{bail, Result};
use reqwest::Client;
use serde::Deserialize;

pub const API_URL: &str = "https://codeforces.com/api/problemset.problems";

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    comment: Option<String>,
    result: Option<ProblemSet>,
}

#[derive(Debug, Deserialize)]
struct ProblemSet {
    problems: Vec<ApiProblem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiProblem {
    contest_id: Option<u32>,
    index: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// Parse an API response, dropping problems without a contest id or index.
pub fn parse_problems(bytes: &[u8]) -> Result<Vec<CodeforcesProblem>> {
    let env: Envelope = serde_json::from_slice(bytes)?;
    if env.status != "OK" {
        bail!("codeforces api error: {}", env.comment.unwrap_or(env.status));
    }
    let Some(set) = env.result else { bail!("codeforces api returned no result") };
    Ok(set
        .problems
        .into_iter()
        .filter_map(|p| {
            let contest_id = p.contest_id?;
            let index = p.index.filter(|i| !i.is_empty())?;
            Some(CodeforcesProblem {
                url: CodeforcesProblem::problem_url(contest_id, &index),
                contest_id,
                index,
                name: p.name,
                tags: p.tags,
            })
        })
        .collect())
}

pub async fn fetch_all(client: &Client, policy: &RetryPolicy) -> Result<Vec<CodeforcesProblem>> {
    let problems = policy
        .run("codeforces api", || {
            let req = client.get(API_URL);
            async move {
                let resp = req.send().await?;
                if !resp.status().is_success() {
                    bail!("status {}", resp.status());
                }
                parse_problems(&resp.bytes().await?)
            }
        })
        .await?;
    tracing::info!(total = problems.len(), "codeforces problems fetched");
    Ok(problems)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_addressable_problems() {
        let body = br#"{"status":"OK","result":{"problems":[
            {"contestId":4,"index":"A","name":"Watermelon","tags":["brute force","math"]},
            {"index":"B","name":"Orphan","tags":[]}
        ],"problemStatistics":[]}}"#;
        let problems = parse_problems(body).unwrap();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].url, "https://codeforces.com/problemset/problem/4/A");
        assert_eq!(problems[0].tags, vec!["brute force", "math"]);
    }

    #[test]
    fn failed_status_is_an_error() {
        let body = br#"{"status":"FAILED","comment":"Call limit exceeded"}"#;
        let err = parse_problems(body).unwrap_err();
        assert!(err.to_string().contains("Call limit exceeded"));
    }
}
