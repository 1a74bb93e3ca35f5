//! GitHub REST API issue source.
//!
//! Authenticated when a token is supplied (normally `GITHUB_TOKEN`),
//! anonymous otherwise. `OGI_API_URL` points the client at another API root
//! such as GitHub Enterprise.

use crate::error::{Error, Result};
use crate::model::{Comment, Issue, RepoScope, StateFilter};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};

use super::pagination::{LinkPagination, parse_link_header};
use super::types::{GhComment, GhIssue};
use super::{IssuePage, IssueSource};

/// Public GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Items requested per page (GitHub's maximum).
pub const PER_PAGE: u32 = 100;

const USER_AGENT: &str = concat!("ogi/", env!("CARGO_PKG_VERSION"));

/// Issue source backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubSource {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubSource {
    /// Build a client against `api_url`, authenticating with `token` when present.
    ///
    /// # Errors
    ///
    /// Returns `RemoteTransport` if the HTTP client cannot be constructed.
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::RemoteTransport {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Build a client from `OGI_API_URL` and `GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteTransport` if the HTTP client cannot be constructed.
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("OGI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(api_url, std::env::var("GITHUB_TOKEN").ok())
    }

    /// Whether requests carry a credential.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        route: &str,
        query: &[(&str, String)],
    ) -> Result<(T, LinkPagination)> {
        let url = format!("{}{route}", self.api_url);
        trace!(url = %url, ?query, "GET");

        let mut request = self
            .client
            .get(&url)
            .query(query)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(|e| Error::RemoteTransport {
            message: format!("request to {url} failed: {e}"),
        })?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => {
                return Err(Error::RemoteAuth {
                    message: format!("{url} returned {status}"),
                });
            }
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::RemoteTransport {
                    message: format!("{url} returned {status}: {}", body.trim()),
                });
            }
            _ => {}
        }

        let pagination = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default();

        let data = response.json::<T>().await.map_err(|e| Error::RemoteTransport {
            message: format!("invalid response from {url}: {e}"),
        })?;

        Ok((data, pagination))
    }
}

impl IssueSource for GitHubSource {
    async fn list_issues(
        &self,
        scope: &RepoScope,
        filter: StateFilter,
        page: u32,
    ) -> Result<IssuePage> {
        let route = format!("/repos/{}/{}/issues", scope.owner, scope.repo);
        let query = [
            ("state", filter.as_str().to_string()),
            ("per_page", PER_PAGE.to_string()),
            ("page", page.to_string()),
        ];

        let (items, pagination) = self.get_page::<Vec<GhIssue>>(&route, &query).await?;
        debug!(
            scope = %scope,
            page,
            items = items.len(),
            next = ?pagination.next_page,
            last = ?pagination.last_page,
            "Fetched issue page"
        );

        Ok(IssuePage {
            issues: items.into_iter().map(Issue::from).collect(),
            next_page: pagination.next_page,
        })
    }

    async fn list_comments(&self, scope: &RepoScope, number: u64) -> Result<Vec<Comment>> {
        let route = format!("/repos/{}/{}/issues/{number}/comments", scope.owner, scope.repo);
        let mut comments = Vec::new();
        let mut page = Some(1u32);

        while let Some(current) = page {
            let query = [("per_page", PER_PAGE.to_string()), ("page", current.to_string())];
            let (items, pagination) = self.get_page::<Vec<GhComment>>(&route, &query).await?;
            comments.extend(items.into_iter().map(Comment::from));
            page = pagination.next_page;
        }

        trace!(scope = %scope, number, comments = comments.len(), "Fetched comments");
        Ok(comments)
    }
}
