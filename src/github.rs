//! GitHub REST API client
//!
//! [`GitHubClient`] layers the rate limiter, the retry controller, and
//! outcome classification on top of the raw transport. Every distinct API
//! call (one page of issues, one page of comments) goes through the full
//! retry path.
//!
//! Pages of issues are walked lazily through [`IssuePages`]: the caller
//! pulls one page at a time, and no request is issued past the point the
//! caller stops pulling.

use crate::config::Config;
use crate::error::Result;
use crate::http::{ApiResponse, HttpClient};
use crate::pagination::{self, Page};
use crate::rate_limit::RateLimiter;
use crate::retry::request_with_retry;
use crate::types::{Comment, Issue, RepoRef};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use url::Url;

/// High-level API client: transport + rate limiting + retry + classification
#[derive(Debug)]
pub struct GitHubClient {
    http: HttpClient,
    api_base: Url,
    page_size: u32,
    retry: crate::config::RetryConfig,
    limiter: Mutex<RateLimiter>,
}

impl GitHubClient {
    /// Build a client from the configuration
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
            api_base: Url::parse(&config.api_base)?,
            page_size: config.page_size,
            retry: config.retry.clone(),
            limiter: Mutex::new(RateLimiter::new(&config.rate_limit)),
        })
    }

    /// The list-issues endpoint for a repository
    fn issues_url(&self, repo: &RepoRef) -> Result<Url> {
        Ok(self
            .api_base
            .join(&format!("repos/{}/{}/issues", repo.owner, repo.name))?)
    }

    /// Start a lazy walk over a repository's issue pages
    pub fn issue_pages(&self, repo: &RepoRef) -> Result<IssuePages<'_>> {
        let start = self.issues_url(repo)?;
        Ok(IssuePages {
            client: self,
            next: Some(start),
            first_query: Some(vec![
                ("per_page", self.page_size.to_string()),
                ("state", "all".to_string()),
            ]),
        })
    }

    /// Fetch every comment of one issue, walking its comment pages to
    /// exhaustion
    pub async fn fetch_comments(&self, issue: &Issue) -> Result<Vec<Comment>> {
        let mut comments = Vec::new();
        let mut next = Some(Url::parse(&issue.comments_url)?);
        let mut query = vec![("per_page", self.page_size.to_string())];

        while let Some(url) = next {
            let page: Page<Comment> = self.get_page(url, &query).await?;
            if page.items.is_empty() {
                break;
            }
            comments.extend(page.items);
            next = page.next;
            // Subsequent requests use the next-link verbatim
            query.clear();
        }

        tracing::debug!(
            issue = issue.number,
            count = comments.len(),
            "fetched comments"
        );
        Ok(comments)
    }

    /// One classified, retried, rate-limited GET returning a decoded page
    async fn get_page<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<Page<T>> {
        let response = request_with_retry(&self.retry, || {
            let url = url.clone();
            async move {
                self.limiter.lock().await.wait_if_needed().await;
                let response = self.http.get(url, query).await?;
                response.into_result()
            }
        })
        .await?;

        log_rate_limit(&response);

        let items = response.json()?;
        let next = pagination::next_url(&response.headers);
        Ok(Page { items, next })
    }
}

/// Lazy, finite walk over a repository's issue pages
///
/// Pull-driven: each [`next_page`](IssuePages::next_page) call issues at
/// most one request, so a caller that stops pulling (limit reached) wastes
/// no calls. The walk terminates when the API omits the `next` link or
/// returns an empty page.
#[derive(Debug)]
pub struct IssuePages<'a> {
    client: &'a GitHubClient,
    next: Option<Url>,
    first_query: Option<Vec<(&'static str, String)>>,
}

impl IssuePages<'_> {
    /// Fetch the next page of issues, in the order the API returns them
    ///
    /// Returns `Ok(None)` once the sequence is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Issue>>> {
        let Some(url) = self.next.take() else {
            return Ok(None);
        };

        let query = self.first_query.take().unwrap_or_default();
        let page: Page<Issue> = self.client.get_page(url, &query).await?;
        if page.items.is_empty() {
            return Ok(None);
        }

        self.next = page.next;
        Ok(Some(page.items))
    }
}

fn log_rate_limit(response: &ApiResponse) {
    if let Some(remaining) = response
        .headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
    {
        tracing::debug!(remaining, "rate limit quota");
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_url_joins_repo_path() {
        let client = GitHubClient::new(&Config::default()).unwrap();
        let repo: RepoRef = "rancher/dartboard".parse().unwrap();
        assert_eq!(
            client.issues_url(&repo).unwrap().as_str(),
            "https://api.github.com/repos/rancher/dartboard/issues"
        );
    }

    #[test]
    fn bad_api_base_is_rejected_at_construction() {
        let config = Config {
            api_base: "not a url".to_string(),
            ..Default::default()
        };
        assert!(GitHubClient::new(&config).is_err());
    }
}
