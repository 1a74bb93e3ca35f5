//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::model::{RepoScope, StateFilter};
use crate::storage::StoreBackend;

pub mod commands;
pub mod context;

pub use context::AppContext;

/// OGI - Offline GitHub Issues
#[derive(Parser, Debug)]
#[command(name = "ogi", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.ogi/issues.db)
    #[arg(long, global = true, env = "OGI_DB")]
    pub db: Option<PathBuf>,

    /// Storage backend
    #[arg(long, value_enum, global = true, env = "OGI_BACKEND", default_value_t)]
    pub backend: StoreBackend,

    /// Remove an issue's old copy when a sync moves it to another state
    #[arg(long, global = true)]
    pub evict_stale: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every issue and comment of a repository into the local database
    ///
    /// Clears what is stored for the repository first. The first run in a
    /// directory needs `owner/repo`; later runs reuse it. Set GITHUB_TOKEN
    /// for private repositories and higher rate limits.
    #[command(alias = "fetch")]
    Sync(SyncArgs),

    /// List stored issues
    List(ListArgs),

    /// Show one stored issue with its comments
    Show {
        /// Issue number
        number: u64,

        /// Print the stored JSON record
        #[arg(short, long)]
        raw: bool,
    },

    /// Delete the local database file
    Delete,

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Repository as owner/repo or a GitHub URL (remembered in .ogi.json)
    pub repo: Option<RepoScope>,

    /// Which issues to fetch
    #[arg(short, long, value_enum, default_value_t)]
    pub state: StateFilter,

    /// Maximum concurrent comment fetches per page (default: one per issue)
    #[arg(short, long)]
    pub concurrency: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Which issues to show
    #[arg(short, long, value_enum, default_value_t = StateFilter::Open)]
    pub state: StateFilter,

    /// Print the stored JSON records
    #[arg(short, long)]
    pub raw: bool,
}
