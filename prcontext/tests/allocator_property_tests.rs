//! Allocator property tests — validation of budget invariants across
//! varied diffs and budgets.
//!
//! Tests verify:
//! - Splitting N headers yields N segments that reconstruct the input
//! - A running count above the ceiling never selects anything
//! - Allocation is deterministic
//! - Raising the ceiling never reduces the number of included files
//! - Selected tokens never exceed the ceiling
//! - Small files survive when a large file cannot fit

use prcontext::budget::{estimate_phase, Allocation, BudgetAllocator};
use prcontext::diff::{assemble_diff, split_diff};
use prcontext::{CharRatioEstimator, EstimatingCounter, TokenBudget, TokenEstimator};

/// Build a diff with one file per entry in `lengths`; each file's segment is
/// exactly `len` characters.
fn build_diff(lengths: &[usize]) -> String {
    lengths
        .iter()
        .enumerate()
        .map(|(i, &len)| {
            let header = format!("diff --git a/src/file{i}.rs b/src/file{i}.rs\n");
            let body = "+".repeat(len.saturating_sub(header.len()));
            format!("{header}{body}\n")
        })
        .collect()
}

fn selected_files(allocation: &Allocation) -> Vec<String> {
    match allocation {
        Allocation::Selected { files, .. } => files.clone(),
        Allocation::NothingFits => Vec::new(),
    }
}

// ── Property: split reconstructs input ────────────────────────────

#[test]
fn prop_split_yields_one_segment_per_header() {
    for lengths in [vec![], vec![80], vec![80, 200, 60], vec![300; 12]] {
        let raw = build_diff(&lengths);
        let segments = split_diff(&raw);
        assert_eq!(segments.len(), lengths.len());

        // Each segment lost only its trailing newline to trimming.
        let rejoined: String = segments
            .iter()
            .map(|s| format!("{}\n", s.diff_content))
            .collect();
        assert_eq!(rejoined, raw, "lengths={:?}", lengths);
    }
}

// ── Property: running > remaining → nothing fits ──────────────────

#[tokio::test]
async fn prop_running_over_remaining_is_nothing_fits() {
    let est = CharRatioEstimator::default();
    let counter = EstimatingCounter::new(CharRatioEstimator::default());
    let raw = build_diff(&[40, 60, 500]);

    for (running, remaining) in [(1, 0), (100, 99), (10_000, 5_000)] {
        let budget = TokenBudget::new(running, remaining);
        let allocation = assemble_diff(&raw, &budget, &est, &counter).await;
        assert_eq!(
            allocation,
            Allocation::NothingFits,
            "running={} remaining={}",
            running,
            remaining
        );
    }
}

// ── Property: determinism ─────────────────────────────────────────

#[tokio::test]
async fn prop_allocation_is_deterministic() {
    let est = CharRatioEstimator::default();
    let counter = EstimatingCounter::new(CharRatioEstimator::default());
    let raw = build_diff(&[120, 90, 90, 700, 45, 300]);
    let budget = TokenBudget::new(10, 150);

    let first = assemble_diff(&raw, &budget, &est, &counter).await;
    let second = assemble_diff(&raw, &budget, &est, &counter).await;
    assert_eq!(first, second);
}

// ── Property: monotonic in tokens_remaining ───────────────────────

#[tokio::test]
async fn prop_more_budget_never_fewer_files() {
    let est = CharRatioEstimator::default();
    let counter = EstimatingCounter::new(CharRatioEstimator::default());
    let raw = build_diff(&[120, 90, 90, 700, 45, 300, 2_000, 60]);

    let mut previous = 0usize;
    for remaining in (0..1_200).step_by(25) {
        let budget = TokenBudget::new(20, remaining);
        let allocation = assemble_diff(&raw, &budget, &est, &counter).await;
        let count = allocation.file_count();
        assert!(
            count >= previous,
            "remaining={}: {} files after {} at a smaller budget",
            remaining,
            count,
            previous
        );
        previous = count;
    }
    assert_eq!(previous, 8);
}

// ── Property: selection respects the ceiling ──────────────────────

#[tokio::test]
async fn prop_selected_tokens_fit_ceiling() {
    let est = CharRatioEstimator::default();
    let counter = EstimatingCounter::new(CharRatioEstimator::default());
    let raw = build_diff(&[350, 35, 700, 70, 1_400, 140]);

    for (running, remaining) in [(0, 50), (30, 200), (0, 1_000), (400, 700)] {
        let budget = TokenBudget::new(running, remaining);
        if let Allocation::Selected { token_count, .. } =
            assemble_diff(&raw, &budget, &est, &counter).await
        {
            assert!(
                running + token_count <= remaining,
                "running={} + selected={} exceeds {}",
                running,
                token_count,
                remaining
            );
        }
    }
}

// ── Scenario: one large file among small ones ─────────────────────

#[tokio::test]
async fn scenario_large_file_skipped_small_file_kept() {
    let est = CharRatioEstimator::default();
    let counter = EstimatingCounter::new(CharRatioEstimator::default());
    let raw = build_diff(&[50, 4_000, 120]);
    let segments = split_diff(&raw);
    let estimates: Vec<u64> = segments.iter().map(|s| est.estimate(&s.diff_content)).collect();
    assert_eq!(estimates, vec![15, 1_143, 35]);

    let budget = TokenBudget::new(0, 40);
    let accepted = estimate_phase(&segments, &budget, &est);
    assert!(accepted.iter().all(|a| a.segment.filename != "src/file1.rs"));

    let allocation = BudgetAllocator::new(&est, &counter)
        .allocate(&segments, &budget)
        .await;
    let files = selected_files(&allocation);
    assert!(files.contains(&"src/file0.rs".to_string()));
    assert!(!files.contains(&"src/file1.rs".to_string()));
}

#[tokio::test]
async fn scenario_empty_diff_is_nothing_fits() {
    let est = CharRatioEstimator::default();
    let counter = EstimatingCounter::new(CharRatioEstimator::default());
    let allocation = assemble_diff("", &TokenBudget::new(0, 100_000), &est, &counter).await;
    assert_eq!(allocation, Allocation::NothingFits);
}

#[tokio::test]
async fn scenario_only_deny_listed_files_is_nothing_fits() {
    let est = CharRatioEstimator::default();
    let counter = EstimatingCounter::new(CharRatioEstimator::default());
    let raw = "diff --git a/img/logo.png b/img/logo.png\nBinary files differ\n\
               diff --git a/Cargo.lock b/Cargo.lock\n+version = 3\n";
    let allocation = assemble_diff(raw, &TokenBudget::new(0, 100_000), &est, &counter).await;
    assert_eq!(allocation, Allocation::NothingFits);
}
