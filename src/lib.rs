//! # issues-dl
//!
//! Resumable GitHub issue downloader backed by SQLite.
//!
//! Downloads all issues (including comments) of a repository through the
//! paginated REST API and persists them incrementally, one transaction per
//! issue. Data lands in the store as it is fetched, which gives resilience
//! against network errors and power loss: on restart, issues already in the
//! store are skipped and the download continues where it left off.
//!
//! Issues already in the store are never refreshed on later runs. To get
//! fresh data, delete the store file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use issues_dl::{Config, Database, IssueDownloader};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         token: std::env::var("GITHUB_TOKEN").ok(),
//!         ..Default::default()
//!     };
//!
//!     let db = Database::new(Path::new("dartboard_issues.db")).await?;
//!     let report = IssueDownloader::new(&config, "rancher/dartboard".parse()?, &db)?
//!         .run()
//!         .await?;
//!
//!     println!("{} issues in store", report.total_in_store);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Database persistence layer
pub mod db;
/// Download orchestration
pub mod downloader;
/// Error types
pub mod error;
/// Flat JSON export
pub mod export;
/// GitHub REST API client
pub mod github;
/// HTTP transport adapter
pub mod http;
/// Pagination via the `Link` response header
pub mod pagination;
/// Proactive request spacing
pub mod rate_limit;
/// Retry logic with exponential backoff
pub mod retry;
/// Core types: repository references, API payloads, run reports
pub mod types;

// Re-export commonly used types
pub use config::{Config, RateLimitConfig, RetryConfig};
pub use db::Database;
pub use downloader::IssueDownloader;
pub use error::{DatabaseError, Error, Result};
pub use github::GitHubClient;
pub use types::{DownloadReport, RepoRef};

use tokio_util::sync::CancellationToken;

/// Create a cancellation token that trips on a termination signal
///
/// The returned token can be handed to
/// [`IssueDownloader::with_cancellation`]; the download then stops cleanly
/// between steps, with every committed issue intact.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal
///   registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
pub fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_token.cancel();
    });
    token
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
