use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A pull request as returned by the list endpoint.
/// Only the fields the export needs are decoded; the rest are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 42)
    pub number: u64,
    /// PR title
    pub title: String,
    /// When the PR was opened
    pub created_at: DateTime<Utc>,
    /// When the PR was merged; None for closed-unmerged or open PRs
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    /// Author of the PR
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// GitHub login
    pub login: String,
}

/// Line statistics from the single-PR endpoint. The list view omits these.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestDetail {
    pub number: u64,
    pub additions: u64,
    pub deletions: u64,
}

/// The repository whose pull requests are exported.
#[derive(Debug, Clone)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Path of the pull request collection endpoint.
    pub fn pulls_path(&self) -> String {
        format!("/repos/{}/{}/pulls", self.owner, self.repo)
    }

    /// Path of a single pull request.
    pub fn pull_path(&self, number: u64) -> String {
        format!("/repos/{}/{}/pulls/{}", self.owner, self.repo, number)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Parameters for walking the pull request list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// `open`, `closed` or `all`. Merged PRs are a subset of `closed`.
    pub state: String,
    pub per_page: u32,
    /// Upper bound on the number of pages requested.
    pub max_pages: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            state: "closed".to_string(),
            per_page: 100,
            max_pages: 10,
        }
    }
}
