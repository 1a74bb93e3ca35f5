//! Sync configuration and results.

use crate::model::{RepoScope, StateFilter};
use serde::Serialize;

/// Tuning knobs for a sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Upper bound on concurrent per-issue tasks within a page.
    ///
    /// `None` runs one task per issue on the page at once.
    pub max_concurrency: Option<usize>,
}

/// Outcome of a completed sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub scope: RepoScope,
    pub state: StateFilter,
    /// Issues held in the store once the sync finished
    pub count: usize,
    /// Remote pages walked
    pub pages: u32,
}
