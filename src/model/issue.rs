//! Issue model for OGI.
//!
//! An issue is the unit of storage: the remote metadata plus every comment,
//! serialized as one JSON payload. The store never looks inside the payload
//! except for `number` and `state`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// States the store partitions by and `all()` unions over.
///
/// Issues saved under any other state are only reachable by number.
pub const RECOGNIZED_STATES: [&str; 2] = [IssueState::Open.as_str(), IssueState::Closed.as_str()];

/// Known remote issue states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Which states a sync requests or a listing shows.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    /// Every issue regardless of state
    #[default]
    All,
    /// Open issues only
    Open,
    /// Closed issues only
    Closed,
}

impl StateFilter {
    /// Query-string value understood by the remote.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Open => IssueState::Open.as_str(),
            Self::Closed => IssueState::Closed.as_str(),
        }
    }

    /// The single partition this filter selects, or `None` for `All`.
    #[must_use]
    pub const fn partition(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Open => Some(IssueState::Open.as_str()),
            Self::Closed => Some(IssueState::Closed.as_str()),
        }
    }
}

impl std::fmt::Display for StateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comment on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Login of the comment author
    pub author: String,

    /// Markdown body
    #[serde(default)]
    pub body: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,

    /// When the comment was last edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An issue mirrored from the remote, with its comments embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number, unique within a repository
    pub number: u64,

    /// Remote state ("open" or "closed" for GitHub)
    pub state: String,

    pub title: String,

    /// Login of the issue author
    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default)]
    pub assignees: Vec<String>,

    /// Browser URL of the issue
    #[serde(default)]
    pub html_url: Option<String>,

    /// True when the remote item is a pull request
    #[serde(default)]
    pub is_pull_request: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,

    /// Comments in remote order
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Issue {
    /// Create an issue with the given identity and empty metadata.
    pub fn new(number: u64, state: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            number,
            state: state.into(),
            title: title.into(),
            author: String::new(),
            body: None,
            labels: Vec::new(),
            assignees: Vec::new(),
            html_url: None,
            is_pull_request: false,
            created_at: now,
            updated_at: now,
            closed_at: None,
            comments: Vec::new(),
        }
    }

    /// Attach comments, replacing any already present.
    #[must_use]
    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    /// Whether `state` is one of the partitions `all()` covers.
    #[must_use]
    pub fn has_recognized_state(&self) -> bool {
        RECOGNIZED_STATES.contains(&self.state.as_str())
    }

    /// Condensed one-line rendering for `ogi list`.
    #[must_use]
    pub fn summary_line(&self) -> String {
        use colored::Colorize;

        let state = match self.state.as_str() {
            "open" => self.state.green(),
            "closed" => self.state.red(),
            _ => self.state.yellow(),
        };
        let mut line = format!("{} [{}] {}", format!("#{}", self.number).cyan(), state, self.title);
        if !self.labels.is_empty() {
            line.push_str(&format!(" {}", format!("({})", self.labels.join(", ")).dimmed()));
        }
        if !self.comments.is_empty() {
            line.push_str(&format!(" {}", format!("[{} comments]", self.comments.len()).dimmed()));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_states() {
        assert!(Issue::new(1, "open", "a").has_recognized_state());
        assert!(Issue::new(2, "closed", "b").has_recognized_state());
        assert!(!Issue::new(3, "draft", "c").has_recognized_state());
    }

    #[test]
    fn test_state_filter_partition() {
        assert_eq!(StateFilter::All.partition(), None);
        assert_eq!(StateFilter::Open.partition(), Some("open"));
        assert_eq!(StateFilter::Closed.as_str(), "closed");
    }

    #[test]
    fn test_payload_keeps_number_state_and_comments() {
        let issue = Issue::new(42, "open", "Crash on start").with_comments(vec![Comment {
            author: "octocat".into(),
            body: "Same here".into(),
            created_at: Utc::now(),
            updated_at: None,
        }]);

        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["number"], 42);
        assert_eq!(value["state"], "open");
        assert_eq!(value["comments"][0]["author"], "octocat");
        assert_eq!(value["comments"][0]["body"], "Same here");
        assert!(value["comments"][0]["created_at"].is_string());
    }

    #[test]
    fn test_summary_line_mentions_number_and_title() {
        colored::control::set_override(false);
        let mut issue = Issue::new(7, "closed", "Typo in README");
        issue.labels = vec!["docs".into()];

        let line = issue.summary_line();
        assert!(line.starts_with("#7 [closed] Typo in README"));
        assert!(line.contains("(docs)"));
    }
}
