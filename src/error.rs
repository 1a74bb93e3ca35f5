//! Error types for OGI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=storage, 3=not_found, 4=validation, 6=remote, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for OGI operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Storage (exit 2)
    StorageOpenError,
    StorageError,

    // Not Found (exit 3)
    IssueNotFound,

    // Validation (exit 4)
    InvalidArgument,

    // Remote (exit 6)
    RemoteAuthError,
    RemoteTransportError,

    // Config (exit 7)
    ScopeMissing,
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::StorageOpenError => "STORAGE_OPEN_ERROR",
            Self::StorageError => "STORAGE_ERROR",
            Self::IssueNotFound => "ISSUE_NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::RemoteAuthError => "REMOTE_AUTH_ERROR",
            Self::RemoteTransportError => "REMOTE_TRANSPORT_ERROR",
            Self::ScopeMissing => "SCOPE_MISSING",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::StorageOpenError | Self::StorageError => 2,
            Self::IssueNotFound => 3,
            Self::InvalidArgument => 4,
            Self::RemoteAuthError | Self::RemoteTransportError => 6,
            Self::ScopeMissing | Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in OGI operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No repository configured")]
    ScopeMissing,

    #[error("Could not open issue database at {}: {source}", path.display())]
    StorageOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Could not create database directory for {}: {source}", path.display())]
    StorageDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unauthorized: {message}")]
    RemoteAuth { message: String },

    #[error("Remote request failed: {message}")]
    RemoteTransport { message: String },

    #[error("Issue #{number} was not found")]
    IssueNotFound { number: u64 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::ScopeMissing => ErrorCode::ScopeMissing,
            Self::StorageOpen { .. } | Self::StorageDir { .. } => ErrorCode::StorageOpenError,
            Self::RemoteAuth { .. } => ErrorCode::RemoteAuthError,
            Self::RemoteTransport { .. } => ErrorCode::RemoteTransportError,
            Self::IssueNotFound { .. } => ErrorCode::IssueNotFound,
            Self::Database(_) | Self::Storage(_) => ErrorCode::StorageError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::ScopeMissing => Some(
                "It looks like you haven't initialized OGI yet!\n  \
                 Run `ogi sync owner/repo` once to fetch every issue of that repository.\n  \
                 The repository is remembered in ./.ogi.json, so later runs need no argument."
                    .to_string(),
            ),

            Self::StorageOpen { path, .. } => Some(format!(
                "Another ogi process may be holding {}. Wait for it to finish, \
                 or pass `--db` to use a different database.",
                path.display()
            )),

            Self::StorageDir { path, .. } => Some(format!(
                "Check the permissions of {}, or pass `--db` to use a different location.",
                path.display()
            )),

            Self::RemoteAuth { .. } => Some(
                "Couldn't access this repository. If it is private, create a GitHub \
                 Personal Access Token and export it as GITHUB_TOKEN."
                    .to_string(),
            ),

            Self::IssueNotFound { .. } => Some(
                "Use `ogi list --state all` to see stored issues, or run `ogi sync` to refresh."
                    .to_string(),
            ),

            Self::InvalidArgument(msg) => {
                if msg.contains("owner/repo") {
                    Some("Repositories are written as owner/repo, e.g. `ogi sync rust-lang/rust`".to_string())
                } else {
                    None
                }
            }

            Self::RemoteTransport { .. }
            | Self::Database(_)
            | Self::Storage(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
