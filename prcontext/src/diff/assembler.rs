//! Raw diff → budget-fitting diff string.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::relevance::is_essential_file;
use super::splitter::{split_diff, FileDiffSegment};
use crate::budget::{Allocation, BudgetAllocator, ExactTokenCounter, TokenBudget, TokenEstimator};
use crate::error::GitHubError;
use crate::pull_request::PullRequestRef;

/// Anything that can return the raw unified diff of a pull request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiffSource: Send + Sync {
    async fn fetch_diff(&self, pr: &PullRequestRef) -> Result<String, GitHubError>;
}

/// Diff portion of the bundle. `diff` is `None` when nothing fits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffContext {
    pub diff: Option<String>,
}

/// Split, filter, and budget a raw diff.
///
/// Pure with respect to the transport, so it can be driven with diff text
/// from anywhere.
pub async fn assemble_diff(
    raw_diff: &str,
    budget: &TokenBudget,
    estimator: &dyn TokenEstimator,
    counter: &dyn ExactTokenCounter,
) -> Allocation {
    let segments = split_diff(raw_diff);
    let total = segments.len();
    let essential: Vec<FileDiffSegment> = segments
        .into_iter()
        .filter(|s| is_essential_file(&s.filename))
        .collect();

    debug!(
        total,
        essential = essential.len(),
        "Filtered diff segments"
    );
    if essential.is_empty() {
        return Allocation::NothingFits;
    }

    BudgetAllocator::new(estimator, counter)
        .allocate(&essential, budget)
        .await
}

/// Fetches a pull request's diff and fits it to a budget.
pub struct DiffAssembler<'a> {
    source: &'a dyn DiffSource,
    estimator: &'a dyn TokenEstimator,
    counter: &'a dyn ExactTokenCounter,
}

impl<'a> DiffAssembler<'a> {
    pub fn new(
        source: &'a dyn DiffSource,
        estimator: &'a dyn TokenEstimator,
        counter: &'a dyn ExactTokenCounter,
    ) -> Self {
        Self {
            source,
            estimator,
            counter,
        }
    }

    /// Never fails: a transport error or an empty selection both yield
    /// `DiffContext { diff: None }`.
    pub async fn assemble(&self, pr: &PullRequestRef, budget: &TokenBudget) -> DiffContext {
        let raw = match self.source.fetch_diff(pr).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(pr = %pr, kind = %e.kind(), error = %e, "Failed to fetch diff");
                return DiffContext::default();
            }
        };

        let allocation = assemble_diff(&raw, budget, self.estimator, self.counter).await;
        match &allocation {
            Allocation::Selected {
                files, token_count, ..
            } => info!(
                pr = %pr,
                files = files.len(),
                tokens = token_count,
                "Diff fits budget"
            ),
            Allocation::NothingFits => info!(
                pr = %pr,
                running = budget.running_token_count,
                remaining = budget.tokens_remaining,
                headroom = budget.headroom(),
                "No diff content fits budget"
            ),
        }

        DiffContext {
            diff: allocation.into_diff(),
        }
    }
}
