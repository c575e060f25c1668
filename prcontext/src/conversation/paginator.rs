//! Dual-cursor pagination over a pull request's comments and reviews.
//!
//! Each round issues one combined query carrying both cursors, so the two
//! collections advance together. Rounds are strictly sequential since each
//! depends on the cursors returned by the previous one.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::bot_filter::simplify_comments;
use super::types::{ConversationContext, LinkedIssue, PageCursor, PullRequestPage};
use crate::error::GitHubError;
use crate::pull_request::PullRequestRef;

/// Maximum combined rounds per pull request.
pub const MAX_PAGES: usize = 100;

/// Runs the combined comments/reviews query for one page.
///
/// `None` cursors request the first page of that collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationSource: Send + Sync {
    async fn fetch_page(
        &self,
        pr: &PullRequestRef,
        comments_cursor: Option<String>,
        reviews_cursor: Option<String>,
    ) -> Result<PullRequestPage, GitHubError>;
}

/// Progress of one paginated collection.
#[derive(Debug, Clone)]
struct CollectionState {
    name: &'static str,
    has_more: bool,
    cursor: Option<String>,
}

impl CollectionState {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            has_more: true,
            cursor: None,
        }
    }

    /// Advance from a page's `pageInfo`. Reporting more pages without a
    /// cursor would refetch the first page forever, so it ends the collection.
    fn advance(&mut self, page_info: &PageCursor, pr: &PullRequestRef) {
        match (&page_info.end_cursor, page_info.has_next_page) {
            (Some(cursor), true) => {
                self.cursor = Some(cursor.clone());
            }
            (None, true) => {
                warn!(
                    pr = %pr,
                    collection = self.name,
                    "hasNextPage without endCursor, treating collection as finished"
                );
                self.has_more = false;
            }
            (_, false) => {
                self.has_more = false;
            }
        }
    }
}

/// Aggregates every non-bot comment and review comment of a pull request.
pub struct GraphQlPaginator<'a> {
    source: &'a dyn ConversationSource,
    max_pages: usize,
}

impl<'a> GraphQlPaginator<'a> {
    pub fn new(source: &'a dyn ConversationSource) -> Self {
        Self {
            source,
            max_pages: MAX_PAGES,
        }
    }

    /// Best-effort: a transport error yields an empty context instead of
    /// propagating.
    pub async fn collect(&self, pr: &PullRequestRef) -> ConversationContext {
        match self.paginate(pr).await {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!(
                    pr = %pr,
                    kind = %e.kind(),
                    error = %e,
                    "Failed to fetch pull request conversation"
                );
                ConversationContext::default()
            }
        }
    }

    async fn paginate(&self, pr: &PullRequestRef) -> Result<ConversationContext, GitHubError> {
        let mut comments_state = CollectionState::new("comments");
        let mut reviews_state = CollectionState::new("reviews");
        let mut ctx = ConversationContext::default();
        let mut pages = 0usize;

        while comments_state.has_more || reviews_state.has_more {
            if pages >= self.max_pages {
                warn!(
                    pr = %pr,
                    pages,
                    comments = ctx.comments.len(),
                    "Hit max page limit, returning partial conversation"
                );
                ctx.truncated = true;
                break;
            }

            let page = self
                .source
                .fetch_page(
                    pr,
                    comments_state.cursor.clone(),
                    reviews_state.cursor.clone(),
                )
                .await?;
            pages += 1;

            if pages == 1 {
                ctx.pr_body = page.body.clone();
                ctx.linked_issues = page
                    .closing_issues_references
                    .nodes
                    .iter()
                    .cloned()
                    .map(LinkedIssue::from)
                    .collect();
            }

            let before = ctx.comments.len();
            if comments_state.has_more {
                ctx.comments
                    .extend(simplify_comments(&page.comments.nodes, pr));
                comments_state.advance(&page.comments.page_info, pr);
            }
            if reviews_state.has_more {
                let review_comments = page
                    .reviews
                    .nodes
                    .iter()
                    .flat_map(|r| r.comments.nodes.iter());
                ctx.comments.extend(simplify_comments(review_comments, pr));
                reviews_state.advance(&page.reviews.page_info, pr);
            }

            debug!(
                pr = %pr,
                page = pages,
                added = ctx.comments.len() - before,
                more_comments = comments_state.has_more,
                more_reviews = reviews_state.has_more,
                "Fetched conversation page"
            );
        }

        info!(
            pr = %pr,
            pages,
            comments = ctx.comments.len(),
            linked_issues = ctx.linked_issues.len(),
            "Collected pull request conversation"
        );
        Ok(ctx)
    }
}
