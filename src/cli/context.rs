//! Per-invocation application context.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use super::Cli;
use crate::config::{resolve_db_path, resolve_scope};
use crate::error::{Error, Result};
use crate::model::RepoScope;
use crate::storage::{IssueStore, StoreOptions, open_store};

/// Everything a command needs once scope and storage are resolved.
pub struct AppContext {
    /// Store handle scoped to `scope`
    pub store: Arc<dyn IssueStore>,
    pub scope: RepoScope,
    pub db_path: PathBuf,
    /// Directory holding the scope file
    pub workdir: PathBuf,
}

impl AppContext {
    /// Resolve scope, then open the configured store for it.
    ///
    /// Scope is resolved first, so a missing scope is reported without
    /// touching the database.
    ///
    /// # Errors
    ///
    /// Returns `ScopeMissing` when no scope is known, `Config` when no
    /// database location can be determined, or `StorageOpen` if the store
    /// cannot be opened.
    pub fn open(cli: &Cli, explicit_scope: Option<&RepoScope>) -> Result<Self> {
        let workdir = std::env::current_dir()?;
        let scope = resolve_scope(explicit_scope, &workdir)?;
        let db_path = db_path(cli)?;

        debug!(scope = %scope, db = %db_path.display(), backend = ?cli.backend, "Opening store");
        let store = open_store(
            cli.backend,
            &db_path,
            scope.clone(),
            StoreOptions {
                evict_stale: cli.evict_stale,
            },
        )?;

        Ok(Self {
            store,
            scope,
            db_path,
            workdir,
        })
    }
}

/// The database file this invocation uses.
///
/// # Errors
///
/// Returns `Config` when no home directory is known and `--db` was not given.
pub fn db_path(cli: &Cli) -> Result<PathBuf> {
    resolve_db_path(cli.db.as_deref())
        .ok_or_else(|| Error::Config("Could not determine the home directory; pass --db".to_string()))
}
