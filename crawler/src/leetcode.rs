//! LeetCode problem list via the public GraphQL endpoint.

use crate::retry::RetryPolicy;
use algosearch_core::sources::LeetCodeProblem;
use anyhow::{bail, Result};
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const GRAPHQL_URL: &str = "https://leetcode.com/graphql";

const LIST_QUERY: &str = r#"
query problemsetQuestionList($categorySlug: String, $limit: Int, $skip: Int) {
  problemsetQuestionList: questionList(
    categorySlug: $categorySlug
    limit: $limit
    skip: $skip
    filters: {}
  ) {
    total: totalNum
    questions: data {
      titleSlug
      title
      difficulty
      topicTags { name }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Data,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Data {
    problemset_question_list: Page,
}

#[derive(Debug, Deserialize)]
pub struct Page {
    pub total: usize,
    #[serde(default)]
    pub questions: Vec<LeetCodeProblem>,
}

pub fn parse_page(bytes: &[u8]) -> Result<Page> {
    let env: Envelope = serde_json::from_slice(bytes)?;
    Ok(env.data.problemset_question_list)
}

async fn fetch_page(
    client: &Client,
    policy: &RetryPolicy,
    skip: usize,
    limit: usize,
) -> Result<Page> {
    let body = serde_json::to_vec(&json!({
        "query": LIST_QUERY,
        "variables": { "categorySlug": "", "skip": skip, "limit": limit },
    }))?;
    policy
        .run("leetcode graphql", || {
            let req = client
                .post(GRAPHQL_URL)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.clone());
            async move {
                let resp = req.send().await?;
                if !resp.status().is_success() {
                    bail!("status {}", resp.status());
                }
                parse_page(&resp.bytes().await?)
            }
        })
        .await
}

/// Fetch every problem, `batch_size` at a time.
pub async fn fetch_all(
    client: &Client,
    policy: &RetryPolicy,
    batch_size: usize,
    page_delay: Duration,
) -> Result<Vec<LeetCodeProblem>> {
    let total = fetch_page(client, policy, 0, 1).await?.total;
    tracing::info!(total, "leetcode problems available");

    let mut all = Vec::with_capacity(total);
    let mut skip = 0;
    while skip < total {
        let page = fetch_page(client, policy, skip, batch_size).await?;
        all.extend(page.questions);
        tracing::info!(fetched = all.len(), total, "leetcode progress");
        skip += batch_size;
        tokio::time::sleep(page_delay).await;
    }
    Ok(all)
}
