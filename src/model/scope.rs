//! Repository scope: the (owner, repo) pair that namespaces stored issues.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An owner/repository pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoScope {
    pub owner: String,
    pub repo: String,
}

impl RepoScope {
    /// Build a scope, rejecting empty or slash-containing parts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if either part is empty or contains `/`.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Result<Self> {
        let owner = owner.into().trim().to_string();
        let repo = repo.into().trim().to_string();

        if owner.is_empty() || repo.is_empty() || owner.contains('/') || repo.contains('/') {
            return Err(Error::InvalidArgument(format!(
                "expected owner/repo, got '{owner}/{repo}'"
            )));
        }

        Ok(Self { owner, repo })
    }

    /// Storage namespace key, `owner/repo`.
    ///
    /// Owner and repo may contain `-` but never `/`, so distinct scopes never
    /// share a key.
    #[must_use]
    pub fn namespace(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().trim_end_matches(".git");
        let s = s
            .strip_prefix("https://github.com/")
            .or_else(|| s.strip_prefix("github.com/"))
            .unwrap_or(s)
            .trim_end_matches('/');

        match s.split_once('/') {
            Some((owner, repo)) => Self::new(owner, repo),
            None => Err(Error::InvalidArgument(format!("expected owner/repo, got '{s}'"))),
        }
    }
}

impl fmt::Display for RepoScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
