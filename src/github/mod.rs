use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

/// Default host for the GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Media type pinning the v3 REST API.
const ACCEPT_V3: &str = "application/vnd.github.v3+json";

const USER_AGENT: &str = "pr-exporter";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("GitHub API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub API returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Minimal read-only view of the GitHub REST API.
///
/// Everything above this trait only ever issues GETs and inspects the
/// decoded JSON, so tests can substitute canned responses.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// GET `path` (relative to the API host) with the given query pairs.
    /// Only a 200 response counts as success.
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ClientError>;
}

/// reqwest-backed client bound to one API host and an optional token.
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET request for `path` with the API headers attached.
    /// An empty token is treated as no token.
    fn request(&self, path: &str, query: &[(&str, String)]) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(self.url_for(path))
            .query(query)
            .header("User-Agent", USER_AGENT)
            .header("Accept", ACCEPT_V3);

        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            request = request.header("Authorization", format!("token {}", token));
        }

        request
    }
}

/// Only a plain 200 counts; 201/204 and redirects are failures too.
fn is_success(status: StatusCode) -> bool {
    status == StatusCode::OK
}

#[async_trait]
impl ApiClient for GitHubClient {
    #[instrument(skip(self, query), fields(base_url = %self.base_url))]
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ClientError> {
        let response = self.request(path, query).send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "received response");

        if !is_success(status) {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}
