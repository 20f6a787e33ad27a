//! Database layer for issues-dl
//!
//! SQLite persistence acting as the resumable checkpoint: two tables,
//! `issues` (keyed by issue number) and `comments` (keyed by comment id,
//! foreign-keyed to issue number).
//!
//! Methods on [`Database`] are organized by domain:
//! - [`migrations`] — Database lifecycle, schema migrations
//! - [`issues`] — Issue/comment writes, resume checks, export query
//!
//! One writer per store file at a time; running two instances against the
//! same store simultaneously is unsupported.

use crate::types::{Comment, Issue};
use sqlx::{FromRow, sqlite::SqlitePool};

mod issues;
mod migrations;

/// Issue row in the store
///
/// Written at most once per number; resume skips, never refreshes.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct IssueRecord {
    /// Issue number, unique within the repository (primary key)
    pub number: i64,
    /// Globally unique issue id
    pub id: i64,
    /// Issue title
    pub title: String,
    /// Issue body
    pub body: Option<String>,
    /// Issue state (`open` or `closed`)
    pub state: String,
    /// Author login
    pub author: Option<String>,
    /// Creation timestamp (RFC 3339, verbatim from the API)
    pub created_at: String,
    /// Last-update timestamp (RFC 3339, verbatim from the API)
    pub updated_at: String,
    /// Number of comments reported by the API
    pub comment_count: i64,
    /// Unix timestamp when this row was committed
    pub fetched_at: i64,
}

/// Comment row in the store, owned by its issue
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct CommentRecord {
    /// Globally unique comment id (primary key)
    pub id: i64,
    /// Number of the issue this comment belongs to
    pub issue_number: i64,
    /// Author login
    pub author: Option<String>,
    /// Comment body
    pub body: Option<String>,
    /// Creation timestamp (RFC 3339, verbatim from the API)
    pub created_at: String,
}

impl IssueRecord {
    /// Build a row from an API payload, stamped with the current time
    pub fn from_api(issue: &Issue) -> Self {
        Self {
            number: issue.number,
            id: issue.id,
            title: issue.title.clone(),
            body: issue.body.clone(),
            state: issue.state.clone(),
            author: issue.user.as_ref().map(|u| u.login.clone()),
            created_at: issue.created_at.clone(),
            updated_at: issue.updated_at.clone(),
            comment_count: issue.comments,
            fetched_at: chrono::Utc::now().timestamp(),
        }
    }
}

impl CommentRecord {
    /// Build a row from an API payload
    pub fn from_api(comment: &Comment, issue_number: i64) -> Self {
        Self {
            id: comment.id,
            issue_number,
            author: comment.user.as_ref().map(|u| u.login.clone()),
            body: comment.body.clone(),
            created_at: comment.created_at.clone(),
        }
    }
}

/// Database handle for issues-dl
pub struct Database {
    pool: SqlitePool,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
