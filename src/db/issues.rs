//! Issue/comment writes, resume checks, and the export query.

use crate::error::DatabaseError;
use crate::error::{Error, Result};
use std::collections::HashSet;

use super::{CommentRecord, Database, IssueRecord};

impl Database {
    /// Whether an issue number is already stored (resume check)
    ///
    /// Indexed lookup on the primary key; cheap enough to call per listing
    /// item.
    pub async fn has_issue(&self, number: i64) -> Result<bool> {
        let row: Option<i64> = sqlx::query_scalar("SELECT number FROM issues WHERE number = ?")
            .bind(number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to check issue existence: {}",
                    e
                )))
            })?;

        Ok(row.is_some())
    }

    /// Highest issue number in the store, if any
    ///
    /// Available for callers whose listing order allows skip-ahead; the
    /// orchestrator itself resumes from the full membership set because
    /// GitHub's default listing order does not.
    pub async fn highest_issue_number(&self) -> Result<Option<i64>> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(number) FROM issues")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to query highest issue number: {}",
                    e
                )))
            })?
            .flatten();

        Ok(max)
    }

    /// All stored issue numbers (resume membership scan)
    pub async fn issue_numbers(&self) -> Result<HashSet<i64>> {
        let numbers: Vec<i64> = sqlx::query_scalar("SELECT number FROM issues")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to list issue numbers: {}",
                    e
                )))
            })?;

        Ok(numbers.into_iter().collect())
    }

    /// Total number of stored issues
    pub async fn count_issues(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM issues")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to count issues: {}",
                    e
                )))
            })?;

        Ok(count as u64)
    }

    /// Store an issue together with all of its comments in one transaction
    ///
    /// Either the issue row and every comment row commit together, or
    /// nothing is written. Insert-only: an already-stored issue number is a
    /// constraint violation, never an overwrite.
    pub async fn insert_issue_with_comments(
        &self,
        issue: &IssueRecord,
        comments: &[CommentRecord],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            Error::Database(DatabaseError::TransactionFailed(format!(
                "Failed to begin transaction: {}",
                e
            )))
        })?;

        sqlx::query(
            r#"
            INSERT INTO issues (
                number, id, title, body, state, author,
                created_at, updated_at, comment_count, fetched_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(issue.number)
        .bind(issue.id)
        .bind(&issue.title)
        .bind(&issue.body)
        .bind(&issue.state)
        .bind(&issue.author)
        .bind(&issue.created_at)
        .bind(&issue.updated_at)
        .bind(issue.comment_count)
        .bind(issue.fetched_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to insert issue {}: {}",
                issue.number, e
            )))
        })?;

        for comment in comments {
            sqlx::query(
                r#"
                INSERT INTO comments (id, issue_number, author, body, created_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(comment.id)
            .bind(comment.issue_number)
            .bind(&comment.author)
            .bind(&comment.body)
            .bind(&comment.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to insert comment {} of issue {}: {}",
                    comment.id, issue.number, e
                )))
            })?;
        }

        // An early return above drops the transaction, which rolls back
        tx.commit().await.map_err(|e| {
            Error::Database(DatabaseError::TransactionFailed(format!(
                "Failed to commit issue {}: {}",
                issue.number, e
            )))
        })?;

        Ok(())
    }

    /// Every stored issue with its nested comments, by issue number
    /// ascending, comments by id ascending
    ///
    /// Consumed by the export collaborator.
    pub async fn all_issues(&self) -> Result<Vec<(IssueRecord, Vec<CommentRecord>)>> {
        let issues = sqlx::query_as::<_, IssueRecord>(
            r#"
            SELECT
                number, id, title, body, state, author,
                created_at, updated_at, comment_count, fetched_at
            FROM issues
            ORDER BY number ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to list issues: {}",
                e
            )))
        })?;

        let mut result = Vec::with_capacity(issues.len());
        for issue in issues {
            let comments = sqlx::query_as::<_, CommentRecord>(
                r#"
                SELECT id, issue_number, author, body, created_at
                FROM comments
                WHERE issue_number = ?
                ORDER BY id ASC
                "#,
            )
            .bind(issue.number)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to list comments of issue {}: {}",
                    issue.number, e
                )))
            })?;

            result.push((issue, comments));
        }

        Ok(result)
    }
}
