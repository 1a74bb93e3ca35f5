//! Configuration management.
//!
//! Two pieces of state live outside the database:
//!
//! - **Database path**: a single global database at `~/.ogi/issues.db`,
//!   overridable with `--db` or `OGI_DB`
//! - **Scope file**: `.ogi.json` in the working directory, remembering which
//!   repository that directory mirrors and when it was last synced

use crate::error::{Error, Result};
use crate::model::RepoScope;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the per-directory scope file.
pub const SCOPE_FILE: &str = ".ogi.json";

/// Environment variable overriding the database location.
pub const DB_ENV: &str = "OGI_DB";

/// The global OGI directory, `~/.ogi/`.
#[must_use]
pub fn global_ogi_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".ogi"))
}

/// Resolve the database path.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly
/// 2. `OGI_DB` environment variable
/// 3. Global location: `~/.ogi/issues.db`
///
/// # Returns
///
/// Returns the path to the database file, or `None` if no home directory is known.
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(db_path) = std::env::var(DB_ENV)
        && !db_path.trim().is_empty()
    {
        return Some(PathBuf::from(db_path));
    }

    global_ogi_dir().map(|dir| dir.join("issues.db"))
}

/// Contents of the scope file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    pub owner: String,
    pub repo: String,

    /// When the last successful sync finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl RepoConfig {
    #[must_use]
    pub fn from_scope(scope: &RepoScope) -> Self {
        Self {
            owner: scope.owner.clone(),
            repo: scope.repo.clone(),
            last_updated: None,
        }
    }

    /// Path of the scope file inside `dir`.
    #[must_use]
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(SCOPE_FILE)
    }

    /// Load the scope file from `dir`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file exists but cannot be read or parsed.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = Self::path_in(dir);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        let config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))?;

        debug!(path = %path.display(), "Loaded scope file");
        Ok(Some(config))
    }

    /// Stamp `last_updated` with the current time and write the scope file into `dir`.
    ///
    /// The file is written to a temporary sibling and renamed into place.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be written.
    pub fn save(&mut self, dir: &Path) -> Result<()> {
        self.last_updated = Some(Utc::now());

        let path = Self::path_in(dir);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(self)?;

        std::fs::write(&tmp, content)
            .and_then(|()| std::fs::rename(&tmp, &path))
            .map_err(|e| Error::Config(format!("Failed to write {}: {e}", path.display())))?;

        debug!(path = %path.display(), "Saved scope file");
        Ok(())
    }

    /// The repository this file names.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if owner or repo is empty or malformed.
    pub fn scope(&self) -> Result<RepoScope> {
        RepoScope::new(&self.owner, &self.repo)
    }
}

/// Decide which repository a command operates on.
///
/// An explicit `owner/repo` argument wins; otherwise the scope file in `dir`
/// is consulted.
///
/// # Errors
///
/// Returns `ScopeMissing` when neither is available.
pub fn resolve_scope(explicit: Option<&RepoScope>, dir: &Path) -> Result<RepoScope> {
    if let Some(scope) = explicit {
        return Ok(scope.clone());
    }

    match RepoConfig::load(dir)? {
        Some(config) => config.scope(),
        None => Err(Error::ScopeMissing),
    }
}
