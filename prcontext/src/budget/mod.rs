//! Token budgeting — cheap estimation, pluggable exact counting, and
//! two-phase greedy allocation of diff segments.

pub mod allocator;
pub mod counter;
pub mod estimator;

pub use allocator::{
    estimate_phase, evict_phase, measure_phase, Allocation, BudgetAllocator, EstimatedSegment,
    MeasuredSegment, TokenBudget,
};
pub use counter::{
    EstimatingCounter, ExactTokenCounter, TiktokenCounter, TokenizerEncoding, TokenizerOptions,
};
pub use estimator::{CharRatioEstimator, TokenEstimator, DEFAULT_CHARS_PER_TOKEN};
