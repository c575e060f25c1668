//! GitHub transport — the only place that talks HTTP.
//!
//! [`GitHubClient`] implements both [`ConversationSource`](crate::conversation::ConversationSource)
//! and [`DiffSource`](crate::diff::DiffSource).

pub mod client;
pub mod query;

pub use client::{decode_conversation_page, GitHubClient, GitHubClientConfig, DEFAULT_API_URL};
pub use query::{PAGE_SIZE, PULL_REQUEST_CONVERSATION_QUERY};
