//! Data models for OGI.
//!
//! This module contains the domain models:
//! - Issue (with embedded comments)
//! - RepoScope (owner/repo pair that namespaces storage)
//! - StateFilter (which remote states a sync or listing covers)

pub mod issue;
pub mod scope;

pub use issue::{Comment, Issue, IssueState, RECOGNIZED_STATES, StateFilter};
pub use scope::RepoScope;
