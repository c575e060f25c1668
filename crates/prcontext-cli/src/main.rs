use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use prcontext::{
    CharRatioEstimator, GitHubClient, PullRequestContextService, PullRequestRef, TiktokenCounter,
    TokenizerEncoding,
};
use prcontext_cli::config::PrContextConfig;
use tracing::info;

/// Build a token-budgeted context bundle for a GitHub pull request.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pull request: `owner/repo#123`, `owner/repo/123`, or a pull request URL
    pull_request: String,

    /// TOML config file (overrides env defaults)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Tokens already used elsewhere in the consumer's context window
    #[arg(long)]
    running_tokens: Option<u64>,

    /// Token ceiling the diff must fit under
    #[arg(long)]
    tokens_remaining: Option<u64>,

    /// Exact tokenizer encoding (cl100k_base, o200k_base)
    #[arg(long)]
    encoding: Option<TokenizerEncoding>,

    /// Pretty-print the JSON bundle
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = PrContextConfig::load(args.config.as_deref())?;
    if let Some(running) = args.running_tokens {
        config.budget.running_token_count = running;
    }
    if let Some(remaining) = args.tokens_remaining {
        config.budget.tokens_remaining = remaining;
    }
    if let Some(encoding) = args.encoding {
        config.tokenizer.encoding = encoding;
    }

    let pr: PullRequestRef = args
        .pull_request
        .parse()
        .context("Invalid pull request reference")?;
    let budget = config.token_budget();
    info!(
        pr = %pr,
        api = %config.github.api_url,
        encoding = %config.tokenizer.encoding,
        running = budget.running_token_count,
        remaining = budget.tokens_remaining,
        "Building context bundle"
    );

    let client = GitHubClient::new(config.client_config()?)
        .context("Failed to build GitHub client")?;
    let estimator = CharRatioEstimator::default();
    let counter = TiktokenCounter::new(config.tokenizer_options())
        .context("Failed to load tokenizer")?;
    let service = PullRequestContextService::new(&client, &client, &estimator, &counter);

    let bundle = service.build(&pr, &budget).await;
    let json = if args.pretty {
        serde_json::to_string_pretty(&bundle)?
    } else {
        serde_json::to_string(&bundle)?
    };
    println!("{json}");

    Ok(())
}
