use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::pr::{PullRequest, PullRequestDetail};

/// Column names of the export, in output order.
pub const HEADER: [&str; 13] = [
    "PR Number",
    "Title",
    "Author Username",
    "Author Name",
    "Author Email",
    "Merger Username",
    "Merger Name",
    "Merger Email",
    "Additions",
    "Deletions",
    "Created At",
    "Merged At",
    "Time to Merge (hours)",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One CSV line. Field order must match `HEADER`.
///
/// The list endpoint only exposes the author login, so the merger columns
/// repeat it. Names and emails need extra lookups and are left empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub number: u64,
    pub title: String,
    pub author_username: String,
    pub author_name: String,
    pub author_email: String,
    pub merger_username: String,
    pub merger_name: String,
    pub merger_email: String,
    pub additions: u64,
    pub deletions: u64,
    pub created_at: String,
    pub merged_at: String,
    #[serde(serialize_with = "two_decimals")]
    pub hours_to_merge: f64,
}

impl ExportRow {
    /// Build a row from a merged pull request, its merge time and its detail.
    pub fn new(pr: &PullRequest, merged_at: DateTime<Utc>, detail: &PullRequestDetail) -> Self {
        Self {
            number: pr.number,
            title: pr.title.clone(),
            author_username: pr.user.login.clone(),
            author_name: String::new(),
            author_email: String::new(),
            merger_username: pr.user.login.clone(),
            merger_name: String::new(),
            merger_email: String::new(),
            additions: detail.additions,
            deletions: detail.deletions,
            created_at: format_timestamp(&pr.created_at),
            merged_at: format_timestamp(&merged_at),
            hours_to_merge: hours_between(&pr.created_at, &merged_at),
        }
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Elapsed hours from `start` to `end`, rounded to two decimal places.
pub fn hours_between(start: &DateTime<Utc>, end: &DateTime<Utc>) -> f64 {
    let hours = (*end - *start).num_seconds() as f64 / 3600.0;
    (hours * 100.0).round() / 100.0
}

fn two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.2}", value))
}
