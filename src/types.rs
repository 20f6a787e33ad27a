//! Core types: repository references, API payloads, and run reports

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Immutable reference to a GitHub repository, supplied once at start
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl FromStr for RepoRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: (*owner).to_string(),
                name: (*name).to_string(),
            }),
            _ => Err(Error::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Issue author or commenter, as returned by the API
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    /// GitHub login name
    pub login: String,
}

/// Marker object present on listing items that are actually pull requests
///
/// The issues listing endpoint interleaves pull requests; items carrying
/// this marker are filtered out client-side.
#[derive(Clone, Debug, Deserialize)]
pub struct PullRequestMarker {}

/// One issue as returned by the list-issues endpoint
///
/// Timestamps are kept verbatim as the RFC 3339 strings the API returns.
#[derive(Clone, Debug, Deserialize)]
pub struct Issue {
    /// Globally unique issue id
    pub id: i64,
    /// Issue number, unique within the repository
    pub number: i64,
    /// Issue title
    pub title: String,
    /// Issue body (absent for some bot-created issues)
    pub body: Option<String>,
    /// Issue state (`open` or `closed`)
    pub state: String,
    /// Issue author
    pub user: Option<User>,
    /// Number of comments on the issue
    pub comments: i64,
    /// Paginated endpoint for this issue's comments
    pub comments_url: String,
    /// Creation timestamp
    pub created_at: String,
    /// Last-update timestamp
    pub updated_at: String,
    /// Present when this listing item is a pull request, not an issue
    pub pull_request: Option<PullRequestMarker>,
}

impl Issue {
    /// Whether this listing item is a pull request in disguise
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// One comment as returned by the list-comments endpoint
#[derive(Clone, Debug, Deserialize)]
pub struct Comment {
    /// Globally unique comment id
    pub id: i64,
    /// Comment author
    pub user: Option<User>,
    /// Comment body
    pub body: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

/// Summary of one completed download run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Issues fetched and persisted by this run
    pub new_issues: u64,
    /// Listing items skipped because they were already in the store
    pub skipped_existing: u64,
    /// Listing items skipped because they were pull requests
    pub skipped_pull_requests: u64,
    /// Total issues in the store after the run
    pub total_in_store: u64,
}
