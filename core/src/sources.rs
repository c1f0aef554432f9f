//! Upstream problem-list shapes and the rules that turn them into
//! [`RawDocument`]s for the index builder.
//!
//! LeetCode documents are searchable by title, topic tags and difficulty;
//! Codeforces documents by name and tags.

use crate::index::{RawDocument, Source};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const LEETCODE_INDEX: &str = "lc_index.json";
pub const CODEFORCES_INDEX: &str = "cf_index.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicTag {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeProblem {
    pub title_slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub topic_tags: Vec<TopicTag>,
}

impl LeetCodeProblem {
    pub fn url(&self) -> String { format!("https://leetcode.com/problems/{}/", self.title_slug) }

    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.title.as_str()];
        parts.extend(self.topic_tags.iter().map(|t| t.name.as_str()));
        parts.push(self.difficulty.as_str());
        join_parts(&parts)
    }

    pub fn to_raw(&self) -> RawDocument {
        RawDocument {
            title: self.title.clone(),
            url: self.url(),
            source: Source::Leetcode,
            raw_text: self.search_text(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesProblem {
    pub contest_id: u32,
    pub index: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: String,
}

impl CodeforcesProblem {
    pub fn problem_url(contest_id: u32, index: &str) -> String {
        format!("https://codeforces.com/problemset/problem/{contest_id}/{index}")
    }

    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.name.as_str()];
        parts.extend(self.tags.iter().map(String::as_str));
        join_parts(&parts)
    }

    pub fn to_raw(&self) -> RawDocument {
        RawDocument {
            title: self.name.clone(),
            url: self.url.clone(),
            source: Source::Codeforces,
            raw_text: self.search_text(),
        }
    }
}

fn join_parts(parts: &[&str]) -> String {
    parts.iter().filter(|p| !p.trim().is_empty()).copied().collect::<Vec<_>>().join(" ")
}

fn read_list<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing {}", path.display()))
}

pub fn load_leetcode(path: &Path) -> Result<Vec<RawDocument>> {
    let problems: Vec<LeetCodeProblem> = read_list(path)?;
    Ok(problems.iter().map(LeetCodeProblem::to_raw).collect())
}

pub fn load_codeforces(path: &Path) -> Result<Vec<RawDocument>> {
    let problems: Vec<CodeforcesProblem> = read_list(path)?;
    Ok(problems.iter().map(CodeforcesProblem::to_raw).collect())
}

/// Load LeetCode then Codeforces problems from `data_dir`. Missing list
/// files are skipped.
pub fn load_problems(data_dir: &Path) -> Result<Vec<RawDocument>> {
    let mut docs = Vec::new();
    let lc = data_dir.join(LEETCODE_INDEX);
    if lc.exists() {
        docs.extend(load_leetcode(&lc)?);
    } else {
        tracing::warn!(path = %lc.display(), "leetcode problem list not found, skipping");
    }
    let cf = data_dir.join(CODEFORCES_INDEX);
    if cf.exists() {
        docs.extend(load_codeforces(&cf)?);
    } else {
        tracing::warn!(path = %cf.display(), "codeforces problem list not found, skipping");
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn leetcode_text_includes_tags_and_difficulty() {
        let p: LeetCodeProblem = serde_json::from_str(
            r#"{"titleSlug":"two-sum","title":"Two Sum","difficulty":"Easy","topicTags":[{"name":"Array"},{"name":"Hash Table"}]}"#,
        )
        .unwrap();
        let raw = p.to_raw();
        assert_eq!(raw.raw_text, "Two Sum Array Hash Table Easy");
        assert_eq!(raw.url, "https://leetcode.com/problems/two-sum/");
        assert_eq!(raw.source, Source::Leetcode);
    }

    #[test]
    fn codeforces_text_is_name_and_tags() {
        let p: CodeforcesProblem = serde_json::from_str(
            r#"{"contestId":4,"index":"A","name":"Watermelon","tags":["brute force","math"],"url":"https://codeforces.com/problemset/problem/4/A"}"#,
        )
        .unwrap();
        assert_eq!(p.search_text(), "Watermelon brute force math");
        assert_eq!(p.url, CodeforcesProblem::problem_url(4, "A"));
    }

    #[test]
    fn loads_leetcode_before_codeforces_and_tolerates_missing_lists() {
        let dir = tempdir().unwrap();
        assert!(load_problems(dir.path()).unwrap().is_empty());

        let cf = r#"[{"contestId":1,"index":"B","name":"Spreadsheets","tags":["implementation"],"url":"u"}]"#;
        let lc = r#"[{"titleSlug":"lru-cache","title":"LRU Cache","topicTags":[]}]"#;
        std::fs::write(dir.path().join(CODEFORCES_INDEX), cf).unwrap();
        std::fs::write(dir.path().join(LEETCODE_INDEX), lc).unwrap();
        let docs = load_problems(dir.path()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].source, Source::Leetcode);
        assert_eq!(docs[1].title, "Spreadsheets");
    }
}
