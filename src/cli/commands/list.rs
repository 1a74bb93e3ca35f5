//! List command implementation.

use std::cmp::Reverse;

use serde::Serialize;

use crate::cli::{AppContext, Cli, ListArgs};
use crate::error::Result;
use crate::model::{Issue, RepoScope, StateFilter};

#[derive(Serialize)]
struct ListOutput<'a> {
    scope: &'a RepoScope,
    state: StateFilter,
    count: usize,
    issues: &'a [Issue],
}

/// Execute the list command.
///
/// # Errors
///
/// Returns `ScopeMissing` if no repository is remembered for this directory,
/// or a storage error if the database cannot be read.
pub fn execute(args: &ListArgs, cli: &Cli, json: bool) -> Result<()> {
    let ctx = AppContext::open(cli, None)?;

    let mut issues = match args.state.partition() {
        Some(state) => ctx.store.all_by_state(state)?,
        None => ctx.store.all()?,
    };
    issues.sort_by_key(|issue| Reverse(issue.number));

    if args.raw {
        println!("{}", serde_json::to_string_pretty(&issues)?);
        return Ok(());
    }

    if json {
        let output = ListOutput {
            scope: &ctx.scope,
            state: args.state,
            count: issues.len(),
            issues: &issues,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    for issue in &issues {
        println!("{}", issue.summary_line());
    }
    println!("\n=== ({}) Issues ===", issues.len());

    Ok(())
}
