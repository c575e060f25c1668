//! Error taxonomy for the transport and tokenizer seams.
//!
//! Only the boundaries produce errors. The paginator and diff assembler
//! absorb them into best-effort results, so callers of the service never
//! see these types unless they talk to a source directly.

use std::fmt;

use thiserror::Error;

/// Errors from the GitHub transport (GraphQL and REST diff requests).
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GraphQL query returned errors: {0}")]
    GraphQl(String),

    #[error("Response parse error: {0}")]
    Parse(String),

    #[error("Pull request {0} not found")]
    NotFound(String),
}

impl GitHubError {
    /// Coarse classification for log fields.
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            Self::Request(_) => TransportErrorKind::Network,
            Self::Status { status, .. } if *status == 403 || *status == 429 => {
                TransportErrorKind::RateLimited
            }
            Self::Status { .. } => TransportErrorKind::Http,
            Self::GraphQl(_) => TransportErrorKind::GraphQl,
            Self::Parse(_) => TransportErrorKind::Decode,
            Self::NotFound(_) => TransportErrorKind::NotFound,
        }
    }
}

/// High-level kind of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    Network,
    RateLimited,
    Http,
    GraphQl,
    Decode,
    NotFound,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::Http => write!(f, "http"),
            Self::GraphQl => write!(f, "graphql"),
            Self::Decode => write!(f, "decode"),
            Self::NotFound => write!(f, "not_found"),
        }
    }
}

/// Errors from an exact token counter.
#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("Unknown tokenizer encoding: {0}")]
    UnknownEncoding(String),

    #[error("Tokenizer failed to load: {0}")]
    Load(String),

    #[error("Tokenization task failed: {0}")]
    Task(String),
}

/// Errors from parsing a pull request reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PullRequestRefError {
    #[error("Expected `owner/repo#number` or a pull request URL, got `{0}`")]
    Malformed(String),

    #[error("Invalid pull request number `{0}`")]
    InvalidNumber(String),
}
