mod config;
mod export;
mod github;
mod pr;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

/// PR Exporter: CLI tool that exports the merged Pull Requests of a GitHub
/// repository, with line-change statistics and time to merge, to CSV.
#[derive(Parser, Debug)]
#[command(name = "pr-exporter", version, about)]
struct Cli {
    /// GitHub API token (falls back to the config file, then GITHUB_TOKEN)
    #[arg(short, long)]
    token: Option<String>,

    /// Repository owner (user or organization)
    #[arg(short, long)]
    owner: String,

    /// Repository name
    #[arg(short, long)]
    repo: String,

    /// Output CSV path
    #[arg(short, long, default_value = "github_prs.csv")]
    file: PathBuf,

    /// Pull request state to list (open, closed, all) [default: closed]
    #[arg(long)]
    state: Option<String>,

    /// Pull requests per page [default: 100]
    #[arg(long)]
    per_page: Option<u32>,

    /// Maximum number of pages to request [default: 10]
    #[arg(long)]
    max_pages: Option<u32>,

    /// Config file path; must exist if given [default: .pr-exporter.toml, optional]
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let _main_span = info_span!("pr_export", owner = %cli.owner, repo = %cli.repo).entered();

    info!("loading configuration");
    let config = config::Config::resolve(cli.config.as_deref())?;
    let options = config.list_options(cli.state, cli.per_page, cli.max_pages);
    let token = config.github_token(cli.token);
    debug!(api_url = config.api_url(), authenticated = token.is_some(), ?options, "resolved settings");

    let client = github::GitHubClient::new(config.api_url(), token);
    let repo = pr::RepoRef::new(cli.owner, cli.repo);
    let exporter = export::CsvExporter::new(&client, repo, options);

    let summary = exporter.export(&cli.file).await?;
    info!(
        listed = summary.listed,
        merged = summary.merged,
        written = summary.written,
        skipped = summary.skipped,
        "done"
    );

    Ok(())
}
