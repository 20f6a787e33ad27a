//! Flat JSON export
//!
//! Reads every stored issue with its nested comments and writes one JSON
//! array, issue number ascending, for downstream analysis tooling.

use crate::db::{CommentRecord, Database, IssueRecord};
use crate::error::Result;
use serde::Serialize;
use std::path::Path;

/// One issue in the export file, comments nested
#[derive(Debug, Serialize)]
pub struct ExportedIssue {
    /// Issue number
    pub number: i64,
    /// Globally unique issue id
    pub id: i64,
    /// Issue title
    pub title: String,
    /// Issue body
    pub body: Option<String>,
    /// Issue state
    pub state: String,
    /// Author login
    pub author: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last-update timestamp
    pub updated_at: String,
    /// Comment count as reported by the API
    pub comment_count: i64,
    /// Comments, by id ascending
    pub comments: Vec<ExportedComment>,
}

/// One comment in the export file
#[derive(Debug, Serialize)]
pub struct ExportedComment {
    /// Comment id
    pub id: i64,
    /// Author login
    pub author: Option<String>,
    /// Comment body
    pub body: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl From<(IssueRecord, Vec<CommentRecord>)> for ExportedIssue {
    fn from((issue, comments): (IssueRecord, Vec<CommentRecord>)) -> Self {
        Self {
            number: issue.number,
            id: issue.id,
            title: issue.title,
            body: issue.body,
            state: issue.state,
            author: issue.author,
            created_at: issue.created_at,
            updated_at: issue.updated_at,
            comment_count: issue.comment_count,
            comments: comments
                .into_iter()
                .map(|c| ExportedComment {
                    id: c.id,
                    author: c.author,
                    body: c.body,
                    created_at: c.created_at,
                })
                .collect(),
        }
    }
}

/// Export the whole store to a JSON file, returning the issue count
pub async fn export_json(db: &Database, path: &Path) -> Result<u64> {
    let issues: Vec<ExportedIssue> = db
        .all_issues()
        .await?
        .into_iter()
        .map(ExportedIssue::from)
        .collect();

    let json = serde_json::to_vec_pretty(&issues)?;
    tokio::fs::write(path, json).await?;

    tracing::info!(count = issues.len(), path = %path.display(), "export written");
    Ok(issues.len() as u64)
}
