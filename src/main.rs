use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use issues_dl::config::DEFAULT_REQUESTS_PER_HOUR;
use issues_dl::{Config, Database, IssueDownloader, RateLimitConfig, RepoRef, shutdown_token};
use std::path::PathBuf;
use tracing::Level;

/// Download GitHub issues to SQLite and export them for analysis
#[derive(Parser, Debug)]
#[command(name = "issues-dl")]
#[command(about = "Resumable GitHub issue downloader", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download all issues (with comments) of a repository into a SQLite store
    Download(DownloadArgs),
    /// Export a store to a flat JSON file
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct DownloadArgs {
    /// GitHub repository in 'owner/repo' format
    repository: String,

    /// Output SQLite database file (default: <repo>_issues.db)
    output: Option<PathBuf>,

    /// Maximum number of issues to download (default: all)
    #[arg(long, short = 'l')]
    limit: Option<u64>,

    /// Maximum requests per hour; actual usage is limited to 90% of this value
    #[arg(long, short = 'r', default_value_t = DEFAULT_REQUESTS_PER_HOUR)]
    rate_limit: u32,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Input SQLite database file
    input: PathBuf,

    /// Output JSON file (default: replaces .db extension with .json)
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    match Cli::parse().command {
        Commands::Download(args) => download(args).await,
        Commands::Export(args) => export(args).await,
    }
}

async fn download(args: DownloadArgs) -> anyhow::Result<()> {
    let repo: RepoRef = args.repository.parse()?;
    let db_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}_issues.db", repo.name)));

    // The token is read here, once, and threaded in explicitly
    let config = Config {
        token: std::env::var("GITHUB_TOKEN").ok(),
        rate_limit: RateLimitConfig {
            requests_per_hour: args.rate_limit,
        },
        ..Default::default()
    };

    let db = Database::new(&db_path)
        .await
        .with_context(|| format!("opening store {}", db_path.display()))?;

    let report = IssueDownloader::new(&config, repo, &db)?
        .with_limit(args.limit)
        .with_cancellation(shutdown_token())
        .run()
        .await?;

    db.close().await;

    tracing::info!(
        "Database {} contains {} issues",
        db_path.display(),
        report.total_in_store
    );
    Ok(())
}

async fn export(args: ExportArgs) -> anyhow::Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("json"));

    let db = Database::new(&args.input)
        .await
        .with_context(|| format!("opening store {}", args.input.display()))?;

    let count = issues_dl::export::export_json(&db, &output).await?;
    db.close().await;

    tracing::info!("Saved {} issues to {}", count, output.display());
    Ok(())
}
