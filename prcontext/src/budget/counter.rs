//! Exact token counting behind a pluggable async trait.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tiktoken_rs::CoreBPE;

use super::estimator::TokenEstimator;
use crate::error::TokenizerError;

/// Exact tokenization of a block of text.
///
/// The allocator depends only on this contract, never on a particular
/// vocabulary.
#[async_trait]
pub trait ExactTokenCounter: Send + Sync {
    /// Count the tokens in `text`.
    async fn count_tokens(&self, text: &str) -> Result<u64, TokenizerError>;

    /// Counter name for logging.
    fn name(&self) -> &str;
}

/// BPE encodings shipped with `tiktoken-rs`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerEncoding {
    #[default]
    Cl100kBase,
    O200kBase,
}

impl fmt::Display for TokenizerEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cl100kBase => write!(f, "cl100k_base"),
            Self::O200kBase => write!(f, "o200k_base"),
        }
    }
}

impl FromStr for TokenizerEncoding {
    type Err = TokenizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cl100k_base" | "cl100k" => Ok(Self::Cl100kBase),
            "o200k_base" | "o200k" => Ok(Self::O200kBase),
            other => Err(TokenizerError::UnknownEncoding(other.to_string())),
        }
    }
}

/// Options fixed when a [`TiktokenCounter`] is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenizerOptions {
    pub encoding: TokenizerEncoding,
    /// Encode `<|endoftext|>` and friends as single special tokens instead of
    /// plain text.
    #[serde(default)]
    pub allow_special_tokens: bool,
}

/// Exact counter backed by a `tiktoken-rs` BPE.
///
/// Encoding is CPU-bound, so each call runs on the blocking pool and
/// concurrent counts do not stall the runtime.
#[derive(Clone)]
pub struct TiktokenCounter {
    bpe: Arc<CoreBPE>,
    options: TokenizerOptions,
}

impl TiktokenCounter {
    pub fn new(options: TokenizerOptions) -> Result<Self, TokenizerError> {
        let bpe = match options.encoding {
            TokenizerEncoding::Cl100kBase => tiktoken_rs::cl100k_base(),
            TokenizerEncoding::O200kBase => tiktoken_rs::o200k_base(),
        }
        .map_err(|e| TokenizerError::Load(e.to_string()))?;

        Ok(Self {
            bpe: Arc::new(bpe),
            options,
        })
    }
}

impl fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("options", &self.options)
            .finish()
    }
}

#[async_trait]
impl ExactTokenCounter for TiktokenCounter {
    async fn count_tokens(&self, text: &str) -> Result<u64, TokenizerError> {
        let bpe = Arc::clone(&self.bpe);
        let allow_special = self.options.allow_special_tokens;
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            let tokens = if allow_special {
                bpe.encode_with_special_tokens(&text)
            } else {
                bpe.encode_ordinary(&text)
            };
            tokens.len() as u64
        })
        .await
        .map_err(|e| TokenizerError::Task(e.to_string()))
    }

    fn name(&self) -> &str {
        match self.options.encoding {
            TokenizerEncoding::Cl100kBase => "tiktoken_cl100k_base",
            TokenizerEncoding::O200kBase => "tiktoken_o200k_base",
        }
    }
}

/// Counter that reports an estimator's figure as the exact count.
///
/// Useful offline (no BPE tables) and in tests where the exact phase should
/// agree with the estimate phase.
#[derive(Debug, Clone, Default)]
pub struct EstimatingCounter<E> {
    estimator: E,
}

impl<E: TokenEstimator> EstimatingCounter<E> {
    pub fn new(estimator: E) -> Self {
        Self { estimator }
    }
}

#[async_trait]
impl<E: TokenEstimator> ExactTokenCounter for EstimatingCounter<E> {
    async fn count_tokens(&self, text: &str) -> Result<u64, TokenizerError> {
        Ok(self.estimator.estimate(text))
    }

    fn name(&self) -> &str {
        self.estimator.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::CharRatioEstimator;

    #[test]
    fn test_encoding_parse() {
        assert_eq!(
            "cl100k_base".parse::<TokenizerEncoding>().unwrap(),
            TokenizerEncoding::Cl100kBase
        );
        assert_eq!(
            " O200K ".parse::<TokenizerEncoding>().unwrap(),
            TokenizerEncoding::O200kBase
        );
        assert!(matches!(
            "p50k".parse::<TokenizerEncoding>(),
            Err(TokenizerError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_encoding_display_roundtrips_through_parse() {
        for enc in [TokenizerEncoding::Cl100kBase, TokenizerEncoding::O200kBase] {
            assert_eq!(enc.to_string().parse::<TokenizerEncoding>().unwrap(), enc);
        }
    }

    #[tokio::test]
    async fn test_estimating_counter_matches_estimator() {
        let counter = EstimatingCounter::new(CharRatioEstimator::default());
        assert_eq!(counter.count_tokens(&"x".repeat(70)).await.unwrap(), 20);
        assert_eq!(counter.name(), "char_ratio");
    }

    #[tokio::test]
    async fn test_tiktoken_counter_counts() {
        let counter = TiktokenCounter::new(TokenizerOptions::default()).unwrap();
        assert_eq!(counter.count_tokens("").await.unwrap(), 0);
        let n = counter.count_tokens("hello world").await.unwrap();
        assert_eq!(n, 2);
        assert_eq!(counter.name(), "tiktoken_cl100k_base");
    }

    #[tokio::test]
    async fn test_tiktoken_special_tokens_option() {
        let plain = TiktokenCounter::new(TokenizerOptions::default()).unwrap();
        let special = TiktokenCounter::new(TokenizerOptions {
            encoding: TokenizerEncoding::Cl100kBase,
            allow_special_tokens: true,
        })
        .unwrap();

        let text = "<|endoftext|>";
        assert_eq!(special.count_tokens(text).await.unwrap(), 1);
        assert!(plain.count_tokens(text).await.unwrap() > 1);
    }
}
