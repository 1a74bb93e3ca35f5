//! Full repository synchronization.
//!
//! A sync replaces the local copy of a repository's issues with the remote's:
//!
//! 1. Clear the store (a failure here aborts before any network traffic)
//! 2. Fetch one page of issues
//! 3. Fan out one task per issue: fetch its comments, save the issue
//! 4. Join every task of the page, then follow the next-page cursor
//!
//! # Example
//!
//! ```ignore
//! use ogi::sync::{SyncOptions, Synchronizer};
//!
//! let sync = Synchronizer::new(store, Arc::new(GitHubSource::from_env()?))
//!     .with_options(SyncOptions { max_concurrency: Some(8) });
//! let report = sync.sync(StateFilter::All).await?;
//! ```

mod engine;
mod types;

pub use engine::Synchronizer;
pub use types::{SyncOptions, SyncReport};
