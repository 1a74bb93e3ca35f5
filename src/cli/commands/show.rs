//! Show command implementation.

use colored::Colorize;

use crate::cli::{AppContext, Cli};
use crate::error::Result;
use crate::model::Issue;

/// Execute the show command.
///
/// # Errors
///
/// Returns `IssueNotFound` if the number is not stored for this repository.
pub fn execute(number: u64, raw: bool, cli: &Cli, json: bool) -> Result<()> {
    let ctx = AppContext::open(cli, None)?;
    let issue = ctx.store.get(number)?;

    if raw {
        println!("{}", serde_json::to_string_pretty(&issue)?);
    } else if json {
        println!("{}", serde_json::to_string(&issue)?);
    } else {
        print_issue(&issue);
    }

    Ok(())
}

fn print_issue(issue: &Issue) {
    println!("{}", issue.summary_line());
    println!();
    println!("Author:   {}", issue.author);
    println!("Created:  {}", issue.created_at.format("%Y-%m-%d %H:%M"));
    println!("Updated:  {}", issue.updated_at.format("%Y-%m-%d %H:%M"));
    if let Some(closed) = issue.closed_at {
        println!("Closed:   {}", closed.format("%Y-%m-%d %H:%M"));
    }
    if !issue.assignees.is_empty() {
        println!("Assigned: {}", issue.assignees.join(", "));
    }
    if let Some(ref url) = issue.html_url {
        println!("URL:      {url}");
    }
    if let Some(ref body) = issue.body
        && !body.trim().is_empty()
    {
        println!();
        println!("{}", body.trim_end());
    }

    for comment in &issue.comments {
        println!();
        println!(
            "{} {}",
            comment.author.bold(),
            comment.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
        );
        println!("{}", comment.body.trim_end());
    }
}
