//! Delete command implementation.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::Cli;
use crate::cli::context::db_path;
use crate::error::Result;

/// SQLite files that accompany the main database.
const SIDECAR_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

#[derive(Serialize)]
struct DeleteOutput {
    path: PathBuf,
    removed: Vec<PathBuf>,
}

/// Execute the delete command.
///
/// Missing files are not an error; deleting twice is a no-op.
///
/// # Errors
///
/// Returns an I/O error if an existing file cannot be removed.
pub fn execute(cli: &Cli, json: bool) -> Result<()> {
    let path = db_path(cli)?;
    let removed = remove_database(&path)?;

    if json {
        let output = DeleteOutput { path, removed };
        println!("{}", serde_json::to_string(&output)?);
    } else if removed.is_empty() {
        println!("No database at {}", path.display());
    } else {
        println!("Deleted {}", path.display());
    }

    Ok(())
}

/// Remove the database file and its SQLite sidecars, returning what existed.
fn remove_database(path: &Path) -> Result<Vec<PathBuf>> {
    let mut candidates = vec![path.to_path_buf()];
    candidates.extend(SIDECAR_SUFFIXES.iter().map(|suffix| {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }));

    let mut removed = Vec::new();
    for candidate in candidates {
        if candidate.exists() {
            std::fs::remove_file(&candidate)?;
            debug!(path = %candidate.display(), "Removed");
            removed.push(candidate);
        }
    }
    Ok(removed)
}
