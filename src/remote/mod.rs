//! Remote issue source.
//!
//! The synchronizer only sees [`IssueSource`]: a paginated issue listing and
//! a per-issue comment listing. [`GitHubSource`] implements it over the
//! GitHub REST API.
//!
//! # Submodules
//!
//! - [`github`] - reqwest client for the GitHub REST API
//! - [`pagination`] - `Link` header parsing
//! - [`types`] - GitHub wire types and conversion into the issue model

pub mod github;
pub mod pagination;
pub mod types;

pub use github::GitHubSource;

use crate::error::Result;
use crate::model::{Comment, Issue, RepoScope, StateFilter};
use std::future::Future;

/// One page of the remote issue listing.
#[derive(Debug, Clone, Default)]
pub struct IssuePage {
    /// Issues on this page, without comments
    pub issues: Vec<Issue>,

    /// Cursor for the following page, `None` on the last page
    pub next_page: Option<u32>,
}

/// Paginated access to a repository's issues.
///
/// Futures must be `Send` so the synchronizer can drive them from spawned tasks.
pub trait IssueSource: Send + Sync {
    /// Fetch page `page` (1-based) of issues matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteAuth` when the credential is rejected, `RemoteTransport`
    /// for any other failure.
    fn list_issues(
        &self,
        scope: &RepoScope,
        filter: StateFilter,
        page: u32,
    ) -> impl Future<Output = Result<IssuePage>> + Send;

    /// Fetch every comment on issue `number`, in remote order.
    ///
    /// # Errors
    ///
    /// Same classification as [`IssueSource::list_issues`].
    fn list_comments(
        &self,
        scope: &RepoScope,
        number: u64,
    ) -> impl Future<Output = Result<Vec<Comment>>> + Send;
}
