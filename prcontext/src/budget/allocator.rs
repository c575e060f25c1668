//! Two-phase greedy selection of diff segments under a token budget.
//!
//! Phase one accepts candidates smallest-first by estimate. Phase two
//! measures the accepted set exactly and evicts from the largest end until
//! the true total fits. Both phases are plain functions so the eviction
//! policy can be exercised without a tokenizer.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::counter::ExactTokenCounter;
use super::estimator::TokenEstimator;
use crate::diff::FileDiffSegment;

/// Caller-owned token allowance for the diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBudget {
    /// Tokens already committed elsewhere in the caller's context window.
    pub running_token_count: u64,
    /// Ceiling that `running_token_count + selected tokens` must not exceed.
    pub tokens_remaining: u64,
}

impl TokenBudget {
    pub fn new(running_token_count: u64, tokens_remaining: u64) -> Self {
        Self {
            running_token_count,
            tokens_remaining,
        }
    }

    /// Room left before anything is selected.
    pub fn headroom(&self) -> u64 {
        self.tokens_remaining
            .saturating_sub(self.running_token_count)
    }
}

/// A segment with its estimated token count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimatedSegment {
    /// Position in the input sequence.
    pub index: usize,
    pub segment: FileDiffSegment,
    pub estimated_tokens: u64,
}

/// A provisionally accepted segment with its exact token count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasuredSegment {
    /// Position in the input sequence.
    pub index: usize,
    pub segment: FileDiffSegment,
    pub token_count: u64,
}

/// Outcome of an allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Allocation {
    /// At least one file fits.
    Selected {
        /// Surviving segments in their original order, newline-joined.
        diff: String,
        /// Filenames of the surviving segments, original order.
        files: Vec<String>,
        /// Exact tokens used by the selection (excluding the running count).
        token_count: u64,
    },
    /// Not even one file fits. The caller proceeds without diff context.
    NothingFits,
}

impl Allocation {
    pub fn into_diff(self) -> Option<String> {
        match self {
            Self::Selected { diff, .. } => Some(diff),
            Self::NothingFits => None,
        }
    }

    pub fn file_count(&self) -> usize {
        match self {
            Self::Selected { files, .. } => files.len(),
            Self::NothingFits => 0,
        }
    }
}

/// Estimate every candidate, sort smallest first, and accept greedily.
///
/// The walk skips a candidate that would overflow and keeps going instead of
/// stopping at the first rejection. Ties keep input order.
pub fn estimate_phase(
    segments: &[FileDiffSegment],
    budget: &TokenBudget,
    estimator: &dyn TokenEstimator,
) -> Vec<EstimatedSegment> {
    let mut estimated: Vec<EstimatedSegment> = segments
        .iter()
        .enumerate()
        .map(|(index, segment)| EstimatedSegment {
            index,
            estimated_tokens: estimator.estimate(&segment.diff_content),
            segment: segment.clone(),
        })
        .collect();
    estimated.sort_by_key(|e| e.estimated_tokens);

    let mut running = budget.running_token_count;
    let mut accepted = Vec::with_capacity(estimated.len());
    for candidate in estimated {
        let next = running.saturating_add(candidate.estimated_tokens);
        if next > budget.tokens_remaining {
            debug!(
                file = %candidate.segment.filename,
                estimated = candidate.estimated_tokens,
                running,
                "Skipping file over estimated budget"
            );
            continue;
        }
        running = next;
        accepted.push(candidate);
    }
    accepted
}

/// Drop files from the end of the accepted order until the exact total fits.
pub fn evict_phase(
    mut measured: Vec<MeasuredSegment>,
    budget: &TokenBudget,
) -> Vec<MeasuredSegment> {
    let mut total = measured.iter().fold(budget.running_token_count, |acc, m| {
        acc.saturating_add(m.token_count)
    });

    while total > budget.tokens_remaining {
        let Some(evicted) = measured.pop() else {
            break;
        };
        total = total.saturating_sub(evicted.token_count);
        debug!(
            file = %evicted.segment.filename,
            tokens = evicted.token_count,
            total,
            "Evicted file after exact measurement"
        );
    }
    measured
}

/// Measure accepted candidates concurrently. A failed count drops the file.
pub async fn measure_phase(
    accepted: Vec<EstimatedSegment>,
    counter: &dyn ExactTokenCounter,
) -> Vec<MeasuredSegment> {
    let counts = join_all(
        accepted
            .iter()
            .map(|candidate| counter.count_tokens(&candidate.segment.diff_content)),
    )
    .await;

    accepted
        .into_iter()
        .zip(counts)
        .filter_map(|(candidate, count)| match count {
            Ok(token_count) => Some(MeasuredSegment {
                index: candidate.index,
                segment: candidate.segment,
                token_count,
            }),
            Err(e) => {
                warn!(
                    file = %candidate.segment.filename,
                    counter = counter.name(),
                    error = %e,
                    "Token counting failed, dropping file"
                );
                None
            }
        })
        .collect()
}

/// Selects the largest useful set of segments that fits a [`TokenBudget`].
pub struct BudgetAllocator<'a> {
    estimator: &'a dyn TokenEstimator,
    counter: &'a dyn ExactTokenCounter,
}

impl<'a> BudgetAllocator<'a> {
    pub fn new(estimator: &'a dyn TokenEstimator, counter: &'a dyn ExactTokenCounter) -> Self {
        Self { estimator, counter }
    }

    /// Run all phases over `segments` (assumed already filtered).
    pub async fn allocate(&self, segments: &[FileDiffSegment], budget: &TokenBudget) -> Allocation {
        let accepted = estimate_phase(segments, budget, self.estimator);
        if accepted.is_empty() {
            debug!(
                candidates = segments.len(),
                running = budget.running_token_count,
                remaining = budget.tokens_remaining,
                headroom = budget.headroom(),
                "No file passed the estimate phase"
            );
            return Allocation::NothingFits;
        }

        let measured = measure_phase(accepted, self.counter).await;
        let mut survivors = evict_phase(measured, budget);
        if survivors.is_empty() {
            debug!(
                candidates = segments.len(),
                "Exact measurement evicted every file"
            );
            return Allocation::NothingFits;
        }

        survivors.sort_by_key(|m| m.index);
        let token_count = survivors.iter().map(|m| m.token_count).sum();
        let files = survivors
            .iter()
            .map(|m| m.segment.filename.clone())
            .collect();
        let diff = survivors
            .iter()
            .map(|m| m.segment.diff_content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Allocation::Selected {
            diff,
            files,
            token_count,
        }
    }
}
