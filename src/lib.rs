//! OGI - Offline GitHub Issues
//!
//! Mirrors a repository's issues and their comments into a local database so
//! they can be browsed without a network connection.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Issue, Comment, RepoScope)
//! - [`storage`] - Partitioned issue store (SQLite and in-memory backends)
//! - [`remote`] - GitHub REST issue source
//! - [`sync`] - Paginated synchronization engine
//! - [`config`] - Database path and per-directory scope file
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod remote;
pub mod storage;
pub mod sync;

pub use error::{Error, Result};
