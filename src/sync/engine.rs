//! Paginated synchronization engine.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use super::types::{SyncOptions, SyncReport};
use crate::error::{Error, Result};
use crate::model::{Issue, RepoScope, StateFilter};
use crate::remote::IssueSource;
use crate::storage::IssueStore;

/// Mirrors one repository from an [`IssueSource`] into an [`IssueStore`].
///
/// The store's scope decides which repository is synced.
pub struct Synchronizer<S> {
    store: Arc<dyn IssueStore>,
    source: Arc<S>,
    options: SyncOptions,
}

impl<S: IssueSource + 'static> Synchronizer<S> {
    pub fn new(store: Arc<dyn IssueStore>, source: Arc<S>) -> Self {
        Self {
            store,
            source,
            options: SyncOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the stored issues with every remote issue matching `filter`.
    ///
    /// Pages are processed strictly in order. Within a page all tasks are
    /// joined even after one fails; the first failure to complete is returned
    /// and no further pages are requested. Issues saved before the failure
    /// stay in the store.
    ///
    /// # Errors
    ///
    /// Returns the store error if clearing fails (no request is made), or the
    /// first remote/storage error raised while walking pages.
    pub async fn sync(&self, filter: StateFilter) -> Result<SyncReport> {
        let scope = self.store.scope().clone();
        info!(scope = %scope, state = %filter, "Starting sync");

        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.clear())
            .await
            .map_err(task_failed)??;
        debug!(scope = %scope, "Cleared local store");

        let limiter = self
            .options
            .max_concurrency
            .map(|n| Arc::new(Semaphore::new(n.clamp(1, Semaphore::MAX_PERMITS))));

        let mut pages = 0u32;
        let mut next = Some(1u32);
        while let Some(page) = next {
            let listing = self.source.list_issues(&scope, filter, page).await?;
            pages += 1;

            let saved = self.process_page(&scope, listing.issues, limiter.as_ref()).await?;
            debug!(scope = %scope, page, saved, "Page complete");

            next = listing.next_page;
        }

        let store = Arc::clone(&self.store);
        let count = tokio::task::spawn_blocking(move || store.count())
            .await
            .map_err(task_failed)??;

        info!(scope = %scope, count, pages, "Sync complete");
        Ok(SyncReport {
            scope,
            state: filter,
            count,
            pages,
        })
    }

    /// Fetch comments for and save every issue on one page, then wait for all of them.
    async fn process_page(
        &self,
        scope: &RepoScope,
        issues: Vec<Issue>,
        limiter: Option<&Arc<Semaphore>>,
    ) -> Result<usize> {
        let mut tasks = JoinSet::new();

        for issue in issues {
            if !issue.has_recognized_state() {
                warn!(scope = %scope, number = issue.number, state = %issue.state, "Unrecognized state; issue will only be reachable by number");
            }

            let source = Arc::clone(&self.source);
            let store = Arc::clone(&self.store);
            let scope = scope.clone();
            let limiter = limiter.cloned();

            tasks.spawn(async move {
                let _permit = match limiter {
                    Some(semaphore) => Some(
                        semaphore
                            .acquire_owned()
                            .await
                            .map_err(|_| Error::Other("sync semaphore closed".to_string()))?,
                    ),
                    None => None,
                };

                let comments = source.list_comments(&scope, issue.number).await?;
                let issue = issue.with_comments(comments);
                tokio::task::spawn_blocking(move || store.save(&issue))
                    .await
                    .map_err(task_failed)?
            });
        }

        let mut saved = 0;
        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            match joined.map_err(task_failed).and_then(|result| result) {
                Ok(()) => saved += 1,
                Err(e) => {
                    warn!(scope = %scope, error = %e, "Issue task failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(saved),
        }
    }
}

fn task_failed(e: JoinError) -> Error {
    Error::Other(format!("sync task failed: {e}"))
}
