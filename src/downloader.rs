//! Download orchestration
//!
//! [`IssueDownloader`] drives the end-to-end fetch loop: read the resume
//! state from the store, walk the issue pages, fetch each new issue's
//! comments, and commit issue plus comments in one transaction before the
//! next API call is issued.
//!
//! Everything runs on a single logical thread of control, one request or
//! store write in flight at a time. Concurrent fetching would risk blowing
//! the rate limit and complicate resume ordering.

use crate::config::Config;
use crate::db::{CommentRecord, Database, IssueRecord};
use crate::error::{Error, Result};
use crate::github::GitHubClient;
use crate::types::{DownloadReport, RepoRef};
use tokio_util::sync::CancellationToken;

/// Orchestrates one resumable download run against one repository
pub struct IssueDownloader<'a> {
    client: GitHubClient,
    db: &'a Database,
    repo: RepoRef,
    limit: Option<u64>,
    cancel: CancellationToken,
}

impl<'a> IssueDownloader<'a> {
    /// Build an orchestrator over an opened store
    pub fn new(config: &Config, repo: RepoRef, db: &'a Database) -> Result<Self> {
        Ok(Self {
            client: GitHubClient::new(config)?,
            db,
            repo,
            limit: None,
            cancel: CancellationToken::new(),
        })
    }

    /// Cap the number of newly fetched issues
    ///
    /// Only issues actually fetched by this run count; items skipped on
    /// resume do not.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Honor an external interrupt between discrete steps
    ///
    /// The token is checked after each committed transaction and before
    /// each API call, so cancellation never leaves a partially-written
    /// issue.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the download to completion, the configured limit, or the first
    /// unrecovered error
    ///
    /// Already-stored issues are skipped, never refreshed; the store stays
    /// consistent and resumable whatever the outcome.
    pub async fn run(&self) -> Result<DownloadReport> {
        let mut known = self.db.issue_numbers().await?;
        if !known.is_empty() {
            tracing::info!(
                count = known.len(),
                "resuming: issues already in the store"
            );
        }

        tracing::info!(repo = %self.repo, limit = ?self.limit, "fetching issues");

        let mut report = DownloadReport::default();
        let mut pages = self.client.issue_pages(&self.repo)?;

        'walk: loop {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let Some(items) = pages.next_page().await? else {
                break;
            };

            for item in items {
                if item.is_pull_request() {
                    report.skipped_pull_requests += 1;
                    continue;
                }
                if known.contains(&item.number) {
                    report.skipped_existing += 1;
                    continue;
                }
                if self.cancel.is_cancelled() {
                    return Err(Error::Cancelled);
                }

                let comments = if item.comments > 0 {
                    self.client.fetch_comments(&item).await?
                } else {
                    Vec::new()
                };

                let record = IssueRecord::from_api(&item);
                let comment_records: Vec<CommentRecord> = comments
                    .iter()
                    .map(|c| CommentRecord::from_api(c, item.number))
                    .collect();

                self.db
                    .insert_issue_with_comments(&record, &comment_records)
                    .await?;

                known.insert(item.number);
                report.new_issues += 1;

                if report.new_issues % 10 == 0 {
                    tracing::info!(fetched = report.new_issues, "progress");
                }

                if let Some(limit) = self.limit
                    && report.new_issues >= limit
                {
                    tracing::info!(limit, "issue limit reached, stopping");
                    break 'walk;
                }
            }
        }

        report.total_in_store = self.db.count_issues().await?;
        tracing::info!(
            new = report.new_issues,
            skipped = report.skipped_existing,
            pull_requests = report.skipped_pull_requests,
            total = report.total_in_store,
            "download complete"
        );
        Ok(report)
    }
}
