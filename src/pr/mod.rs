pub mod types;

pub use types::{ListOptions, PullRequest, PullRequestDetail, RepoRef};

use crate::github::ApiClient;
use serde_json::Value;
use tracing::{debug, error, instrument};

/// Walk the pull request list page by page and concatenate the results.
///
/// Stops at the first empty page, after `max_pages` pages, or at the first
/// failed request. A failure keeps whatever was collected before it; no
/// page is retried. Items that don't decode (e.g. a deleted author) are
/// logged and skipped without ending the walk.
#[instrument(skip(client, repo, opts), fields(repo = %repo, state = %opts.state))]
pub async fn list_pull_requests(
    client: &dyn ApiClient,
    repo: &RepoRef,
    opts: &ListOptions,
) -> Vec<PullRequest> {
    let path = repo.pulls_path();
    let mut all = Vec::new();

    for page in 1..=opts.max_pages {
        let query = [
            ("state", opts.state.clone()),
            ("per_page", opts.per_page.to_string()),
            ("page", page.to_string()),
        ];

        let body = match client.get_json(&path, &query).await {
            Ok(body) => body,
            Err(e) => {
                error!(page, error = %e, "failed to fetch pull request page");
                break;
            }
        };

        let raw: Vec<Value> = match serde_json::from_value(body) {
            Ok(raw) => raw,
            Err(e) => {
                error!(page, error = %e, "unexpected pull request page body");
                break;
            }
        };

        if raw.is_empty() {
            debug!(page, "empty page, stopping");
            break;
        }

        let count = raw.len();
        for item in raw {
            match serde_json::from_value::<PullRequest>(item) {
                Ok(pull) => all.push(pull),
                Err(e) => error!(page, error = %e, "skipping undecodable pull request"),
            }
        }
        debug!(page, count, "fetched pull request page");
    }

    all
}

/// Fetch addition/deletion counts for a single pull request.
/// Returns None (after logging) if the request or decoding fails.
#[instrument(skip(client, repo), fields(repo = %repo))]
pub async fn fetch_pull_request_detail(
    client: &dyn ApiClient,
    repo: &RepoRef,
    number: u64,
) -> Option<PullRequestDetail> {
    let body = match client.get_json(&repo.pull_path(number), &[]).await {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "failed to fetch pull request detail");
            return None;
        }
    };

    match serde_json::from_value::<PullRequestDetail>(body) {
        Ok(detail) => {
            debug!(pr = detail.number, additions = detail.additions, deletions = detail.deletions, "fetched detail");
            Some(detail)
        }
        Err(e) => {
            error!(error = %e, "unexpected pull request detail body");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::testing::FakeClient;
    use serde_json::json;

    const PULLS: &str = "/repos/org/repo/pulls";

    fn item(number: u64) -> Value {
        json!({
            "number": number,
            "title": format!("PR {}", number),
            "created_at": "2024-01-01T00:00:00Z",
            "merged_at": null,
            "user": { "login": "alice" }
        })
    }

    fn repo() -> RepoRef {
        RepoRef::new("org", "repo")
    }

    #[tokio::test]
    async fn test_list_stops_at_empty_page() {
        let fake = FakeClient::new()
            .with_page(PULLS, 1, json!([item(3), item(2)]))
            .with_page(PULLS, 2, json!([item(1)]))
            .with_page(PULLS, 3, json!([]));

        let prs = list_pull_requests(&fake, &repo(), &ListOptions::default()).await;
        let numbers: Vec<u64> = prs.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![3, 2, 1]);
        assert_eq!(fake.call_count(), 3);
    }

    #[tokio::test]
    async fn test_list_stops_at_max_pages() {
        let mut fake = FakeClient::new();
        for page in 1..=5 {
            fake = fake.with_page(PULLS, page, json!([item(page as u64)]));
        }
        let opts = ListOptions {
            max_pages: 3,
            ..ListOptions::default()
        };

        let prs = list_pull_requests(&fake, &repo(), &opts).await;
        assert_eq!(prs.len(), 3);
        assert_eq!(fake.call_count(), 3);
    }

    #[tokio::test]
    async fn test_list_sends_state_and_paging_params() {
        let fake = FakeClient::new().with_page(PULLS, 1, json!([]));
        let opts = ListOptions {
            state: "all".to_string(),
            per_page: 50,
            max_pages: 10,
        };

        list_pull_requests(&fake, &repo(), &opts).await;

        let calls = fake.calls.lock().unwrap();
        let (path, query) = &calls[0];
        assert_eq!(path, PULLS);
        assert!(query.contains(&("state".to_string(), "all".to_string())));
        assert!(query.contains(&("per_page".to_string(), "50".to_string())));
        assert!(query.contains(&("page".to_string(), "1".to_string())));
    }

    #[tokio::test]
    async fn test_list_keeps_pages_before_failure() {
        let fake = FakeClient::new()
            .with_page(PULLS, 1, json!([item(1)]))
            .with_page_status(PULLS, 2, 500)
            .with_page(PULLS, 3, json!([item(3)]));

        let prs = list_pull_requests(&fake, &repo(), &ListOptions::default()).await;
        assert_eq!(prs.len(), 1);
        assert_eq!(fake.call_count(), 2);
    }

    #[tokio::test]
    async fn test_list_first_page_failure_is_empty() {
        let fake = FakeClient::new().with_page_status(PULLS, 1, 401);
        let prs = list_pull_requests(&fake, &repo(), &ListOptions::default()).await;
        assert!(prs.is_empty());
        assert_eq!(fake.call_count(), 1);
    }

    #[tokio::test]
    async fn test_list_non_array_body_halts() {
        let fake = FakeClient::new()
            .with_page(PULLS, 1, json!({ "message": "Moved Permanently" }));
        let prs = list_pull_requests(&fake, &repo(), &ListOptions::default()).await;
        assert!(prs.is_empty());
    }

    #[tokio::test]
    async fn test_list_skips_bad_item_and_keeps_paging() {
        let deleted_author = json!({
            "number": 2,
            "title": "Orphaned",
            "created_at": "2024-01-01T00:00:00Z",
            "merged_at": null,
            "user": null
        });
        let fake = FakeClient::new()
            .with_page(PULLS, 1, json!([item(3), deleted_author]))
            .with_page(PULLS, 2, json!([item(1)]))
            .with_page(PULLS, 3, json!([]));

        let prs = list_pull_requests(&fake, &repo(), &ListOptions::default()).await;
        let numbers: Vec<u64> = prs.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![3, 1]);
        assert_eq!(fake.call_count(), 3);
    }

    #[tokio::test]
    async fn test_list_page_of_only_bad_items_is_not_empty() {
        let fake = FakeClient::new()
            .with_page(PULLS, 1, json!([{ "number": 5 }]))
            .with_page(PULLS, 2, json!([item(4)]))
            .with_page(PULLS, 3, json!([]));

        let prs = list_pull_requests(&fake, &repo(), &ListOptions::default()).await;
        assert_eq!(prs.len(), 1);
        assert_eq!(fake.call_count(), 3);
    }

    #[tokio::test]
    async fn test_detail_success() {
        let fake = FakeClient::new().with_resource(
            "/repos/org/repo/pulls/1",
            json!({ "number": 1, "additions": 10, "deletions": 2 }),
        );
        let detail = fetch_pull_request_detail(&fake, &repo(), 1).await.unwrap();
        assert_eq!(detail.number, 1);
        assert_eq!(detail.additions, 10);
        assert_eq!(detail.deletions, 2);
    }

    #[tokio::test]
    async fn test_detail_failure_is_none() {
        let fake = FakeClient::new().with_resource_status("/repos/org/repo/pulls/9", 404);
        assert!(fetch_pull_request_detail(&fake, &repo(), 9).await.is_none());
    }
}
