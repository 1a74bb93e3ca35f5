//! Local issue storage for OGI.
//!
//! Every backend implements [`IssueStore`]: durable keyed storage for one
//! repository scope, partitioned by issue state, with a number → state index
//! so single-issue lookups know which partition to read.
//!
//! - Saves are atomic: payload and index entry commit together or not at all
//! - Mutations are serialized per store handle; reads see committed saves only
//! - `all()` covers the fixed partitions in [`RECOGNIZED_STATES`]
//!
//! # Submodules
//!
//! - [`schema`] - SQLite schema definitions
//! - [`sqlite`] - Durable SQLite backend
//! - [`memory`] - In-memory backend for tests and dry runs

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::model::{Issue, RECOGNIZED_STATES, RepoScope};
use std::path::Path;
use std::sync::Arc;

/// Storage capability shared by every backend.
///
/// One handle is scoped to exactly one repository. Handles are shared across
/// sync tasks, so implementations do their own locking.
pub trait IssueStore: Send + Sync {
    /// The repository this handle is scoped to.
    fn scope(&self) -> &RepoScope;

    /// Remove every partition and the index, leaving an empty namespace.
    ///
    /// Safe to call on an already-empty scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be committed.
    fn clear(&self) -> Result<()>;

    /// Upsert `issue` into the partition named by its state and point the index at it.
    ///
    /// A record left in a different partition by an earlier save is only
    /// removed when [`StoreOptions::evict_stale`] is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; nothing is applied in that case.
    fn save(&self, issue: &Issue) -> Result<()>;

    /// Look up one issue by number.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` when the index has no entry or the indexed
    /// partition no longer holds the record.
    fn get(&self, number: u64) -> Result<Issue>;

    /// Every issue stored under one of [`RECOGNIZED_STATES`], in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn all(&self) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        for state in RECOGNIZED_STATES {
            issues.extend(self.all_by_state(state)?);
        }
        Ok(issues)
    }

    /// Every issue in one partition; empty when the partition does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn all_by_state(&self, state: &str) -> Result<Vec<Issue>>;

    /// Number of indexed issues in this scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn count(&self) -> Result<usize>;
}

/// Which storage engine backs a store handle.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreBackend {
    /// SQLite database file (default)
    #[default]
    Sqlite,
    /// Process-local memory, discarded on exit
    Memory,
}

/// Behavioural switches for a store handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Delete an issue's record from its previous partition when a save moves it.
    pub evict_stale: bool,
}

/// Open a store handle for `scope` on the selected backend.
///
/// `path` is ignored by the memory backend.
///
/// # Errors
///
/// Returns `StorageOpen` if the database cannot be opened or is locked by
/// another process.
pub fn open_store(
    backend: StoreBackend,
    path: &Path,
    scope: RepoScope,
    options: StoreOptions,
) -> Result<Arc<dyn IssueStore>> {
    match backend {
        StoreBackend::Sqlite => Ok(Arc::new(SqliteStore::open(path, scope, options)?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new(scope, options))),
    }
}
