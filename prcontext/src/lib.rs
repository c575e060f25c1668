//! Pull request context bundles for size-limited consumers.
//!
//! This library provides:
//! - Comment and review aggregation over GitHub's GraphQL API with
//!   dual-cursor pagination, bot filtering, and a page ceiling
//! - Unified diff splitting, essential-file filtering, and two-phase
//!   token-budget allocation (cheap estimate, then exact count)
//! - A `reqwest` GitHub transport and a `tiktoken-rs` exact counter
//!
//! # Usage
//!
//! ```no_run
//! use prcontext::{
//!     CharRatioEstimator, GitHubClient, GitHubClientConfig, PullRequestContextService,
//!     PullRequestRef, TiktokenCounter, TokenBudget, TokenizerOptions,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GitHubClient::new(GitHubClientConfig {
//!     token: std::env::var("GITHUB_TOKEN")?,
//!     ..Default::default()
//! })?;
//! let estimator = CharRatioEstimator::default();
//! let counter = TiktokenCounter::new(TokenizerOptions::default())?;
//! let service = PullRequestContextService::new(&client, &client, &estimator, &counter);
//!
//! let pr: PullRequestRef = "acme/widgets#42".parse()?;
//! let bundle = service.build(&pr, &TokenBudget::new(2_000, 100_000)).await;
//! println!("{} comments, diff included: {}", bundle.comments.len(), bundle.diff.is_some());
//! # Ok(())
//! # }
//! ```

pub mod budget;
pub mod conversation;
pub mod diff;
pub mod error;
pub mod github;
pub mod pull_request;
pub mod service;

pub use budget::{
    Allocation, BudgetAllocator, CharRatioEstimator, EstimatingCounter, ExactTokenCounter,
    TiktokenCounter, TokenBudget, TokenEstimator, TokenizerEncoding, TokenizerOptions,
};
pub use conversation::{
    ConversationContext, ConversationSource, GraphQlPaginator, LinkedIssue, SimplifiedComment,
};
pub use diff::{DiffAssembler, DiffContext, DiffSource, FileDiffSegment};
pub use error::{GitHubError, PullRequestRefError, TokenizerError};
pub use github::{GitHubClient, GitHubClientConfig};
pub use pull_request::PullRequestRef;
pub use service::{ContextBundle, PullRequestContextService};
