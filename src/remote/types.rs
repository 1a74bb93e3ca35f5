//! GitHub REST wire types.
//!
//! Only the fields the issue model keeps are declared; everything else in
//! the response is ignored by serde.

use crate::model::{Comment, Issue};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GhUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct GhLabel {
    pub name: String,
}

/// An item from `GET /repos/{owner}/{repo}/issues`.
#[derive(Debug, Deserialize)]
pub struct GhIssue {
    pub number: u64,
    pub state: String,
    pub title: String,
    pub user: Option<GhUser>,
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<GhLabel>,
    #[serde(default)]
    pub assignees: Vec<GhUser>,
    pub html_url: Option<String>,
    /// Present only on pull requests
    pub pull_request: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// An item from `GET /repos/{owner}/{repo}/issues/{number}/comments`.
#[derive(Debug, Deserialize)]
pub struct GhComment {
    pub user: Option<GhUser>,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn login(user: Option<GhUser>) -> String {
    user.map(|u| u.login).unwrap_or_default()
}

impl From<GhIssue> for Issue {
    fn from(gh: GhIssue) -> Self {
        Self {
            number: gh.number,
            state: gh.state,
            title: gh.title,
            author: login(gh.user),
            body: gh.body,
            labels: gh.labels.into_iter().map(|l| l.name).collect(),
            assignees: gh.assignees.into_iter().map(|u| u.login).collect(),
            html_url: gh.html_url,
            is_pull_request: gh.pull_request.is_some(),
            created_at: gh.created_at,
            updated_at: gh.updated_at,
            closed_at: gh.closed_at,
            comments: Vec::new(),
        }
    }
}

impl From<GhComment> for Comment {
    fn from(gh: GhComment) -> Self {
        Self {
            author: login(gh.user),
            body: gh.body.unwrap_or_default(),
            created_at: gh.created_at,
            updated_at: gh.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_conversion() {
        let json = r#"{
            "number": 1347,
            "state": "open",
            "title": "Found a bug",
            "user": {"login": "octocat", "id": 1},
            "body": "I'm having a problem with this.",
            "labels": [{"name": "bug", "color": "f29513"}],
            "assignees": [{"login": "hubot"}],
            "html_url": "https://github.com/octocat/Hello-World/issues/1347",
            "comments": 3,
            "created_at": "2011-04-22T13:33:48Z",
            "updated_at": "2011-04-22T13:33:48Z",
            "closed_at": null
        }"#;

        let issue: Issue = serde_json::from_str::<GhIssue>(json).unwrap().into();
        assert_eq!(issue.number, 1347);
        assert_eq!(issue.state, "open");
        assert_eq!(issue.author, "octocat");
        assert_eq!(issue.labels, vec!["bug"]);
        assert_eq!(issue.assignees, vec!["hubot"]);
        assert!(!issue.is_pull_request);
        assert!(issue.closed_at.is_none());
        assert!(issue.comments.is_empty());
    }

    #[test]
    fn test_pull_request_flag_and_ghost_user() {
        let json = r#"{
            "number": 2,
            "state": "closed",
            "title": "Fix",
            "user": null,
            "body": null,
            "pull_request": {"url": "https://api.github.com/repos/o/r/pulls/2"},
            "created_at": "2020-01-01T00:00:00Z",
            "updated_at": "2020-01-02T00:00:00Z",
            "closed_at": "2020-01-02T00:00:00Z"
        }"#;

        let issue: Issue = serde_json::from_str::<GhIssue>(json).unwrap().into();
        assert!(issue.is_pull_request);
        assert_eq!(issue.author, "");
        assert!(issue.labels.is_empty());
        assert!(issue.closed_at.is_some());
    }

    #[test]
    fn test_comment_conversion() {
        let json = r#"{
            "user": {"login": "octocat"},
            "body": "Me too",
            "created_at": "2011-04-14T16:00:49Z",
            "updated_at": "2011-04-14T16:00:49Z"
        }"#;

        let comment: Comment = serde_json::from_str::<GhComment>(json).unwrap().into();
        assert_eq!(comment.author, "octocat");
        assert_eq!(comment.body, "Me too");
        assert!(comment.updated_at.is_some());
    }
}
