//! Version command implementation.

use serde::Serialize;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::resolve_db_path;
use crate::error::Result;
use crate::remote::github::DEFAULT_API_URL;
use crate::storage::StoreBackend;

#[derive(Serialize)]
struct VersionOutput {
    version: &'static str,
    backend: String,
    database: Option<PathBuf>,
    api_url: String,
    authenticated: bool,
}

/// Execute the version command.
///
/// Besides the version, reports where issues would be stored and which API
/// a sync would talk to.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(cli: &Cli, json: bool) -> Result<()> {
    let output = VersionOutput {
        version: env!("CARGO_PKG_VERSION"),
        backend: format!("{:?}", cli.backend).to_lowercase(),
        database: match cli.backend {
            StoreBackend::Sqlite => resolve_db_path(cli.db.as_deref()),
            StoreBackend::Memory => None,
        },
        api_url: std::env::var("OGI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        authenticated: std::env::var("GITHUB_TOKEN").is_ok_and(|t| !t.trim().is_empty()),
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("ogi version {}", output.version);
    match &output.database {
        Some(path) => println!("  database: {}", path.display()),
        None => println!("  database: (in memory)"),
    }
    println!(
        "  remote:   {} ({})",
        output.api_url,
        if output.authenticated { "GITHUB_TOKEN set" } else { "anonymous" }
    );
    Ok(())
}
