//! Cheap token estimation with a pluggable estimator.
//!
//! The estimate only orders candidates and gives a first accept/reject
//! signal. Exact counts come from an [`ExactTokenCounter`](super::ExactTokenCounter).

/// Characters per token for diff text.
pub const DEFAULT_CHARS_PER_TOKEN: f64 = 3.5;

/// Trait for estimating token counts from text.
pub trait TokenEstimator: Send + Sync {
    /// Estimate the number of tokens in the given text.
    fn estimate(&self, text: &str) -> u64;

    /// Estimator name for logging.
    fn name(&self) -> &str;
}

/// Character-count based estimator (`ceil(chars / chars_per_token)`).
#[derive(Debug, Clone)]
pub struct CharRatioEstimator {
    /// Characters per token.
    pub chars_per_token: f64,
}

impl Default for CharRatioEstimator {
    fn default() -> Self {
        Self {
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
        }
    }
}

impl TokenEstimator for CharRatioEstimator {
    fn estimate(&self, text: &str) -> u64 {
        if self.chars_per_token.is_nan() || self.chars_per_token <= 0.0 {
            return text.chars().count() as u64;
        }
        (text.chars().count() as f64 / self.chars_per_token).ceil() as u64
    }

    fn name(&self) -> &str {
        "char_ratio"
    }
}
