//! Conversation context — every non-bot comment and review comment of a
//! pull request, plus the issues it closes.
//!
//! # Modules
//!
//! - [`types`] — typed GraphQL page and normalized output records
//! - [`bot_filter`] — `author.type == "Bot"` exclusion
//! - [`paginator`] — dual-cursor pagination with a page ceiling

pub mod bot_filter;
pub mod paginator;
pub mod types;

pub use bot_filter::{should_retain, simplify_comments, BOT_AUTHOR_TYPE};
pub use paginator::{ConversationSource, GraphQlPaginator, MAX_PAGES};
pub use types::{
    Author, CommentNode, CommentUser, Connection, ConversationContext, IssueNode, LinkedIssue,
    PageCursor, PullRequestPage, ReviewNode, SimplifiedComment,
};
