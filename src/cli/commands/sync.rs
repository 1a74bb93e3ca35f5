//! Sync command implementation.

use std::sync::Arc;

use tracing::warn;

use crate::cli::{AppContext, Cli, SyncArgs};
use crate::config::RepoConfig;
use crate::error::{Error, Result};
use crate::remote::GitHubSource;
use crate::sync::{SyncOptions, Synchronizer};

/// Execute the sync command.
///
/// On success the scope file in the working directory is (re)written with
/// the synced repository and the current time.
///
/// # Errors
///
/// Returns `ScopeMissing` if no repository is given or remembered, and any
/// storage or remote error raised by the sync.
pub fn execute(args: &SyncArgs, cli: &Cli, json: bool) -> Result<()> {
    if args.concurrency == Some(0) {
        return Err(Error::InvalidArgument(
            "--concurrency must be at least 1".to_string(),
        ));
    }

    let ctx = AppContext::open(cli, args.repo.as_ref())?;

    let source = GitHubSource::from_env()?;
    if !source.is_authenticated() {
        warn!("GITHUB_TOKEN is not set; using unauthenticated requests (public repositories only, low rate limit)");
    }

    let synchronizer = Synchronizer::new(Arc::clone(&ctx.store), Arc::new(source)).with_options(
        SyncOptions {
            max_concurrency: args.concurrency,
        },
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;
    let report = rt.block_on(synchronizer.sync(args.state))?;

    RepoConfig::from_scope(&report.scope).save(&ctx.workdir)?;

    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else if !cli.quiet {
        println!("Fetched {} issues for {}", report.count, report.scope);
    }

    Ok(())
}
