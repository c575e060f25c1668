//! Top-level entry point: conversation and diff for one pull request.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::budget::{ExactTokenCounter, TokenBudget, TokenEstimator};
use crate::conversation::{
    ConversationContext, ConversationSource, GraphQlPaginator, LinkedIssue, SimplifiedComment,
};
use crate::diff::{DiffAssembler, DiffContext, DiffSource};
use crate::pull_request::PullRequestRef;

/// Everything a downstream consumer needs about one pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBundle {
    pub pull_request: PullRequestRef,
    pub pr_body: Option<String>,
    pub comments: Vec<SimplifiedComment>,
    pub linked_issues: Vec<LinkedIssue>,
    /// `None` when no diff content fits the budget.
    pub diff: Option<String>,
    /// Pagination stopped at the page ceiling.
    pub conversation_truncated: bool,
}

impl ContextBundle {
    fn from_parts(
        pr: &PullRequestRef,
        conversation: ConversationContext,
        diff: DiffContext,
    ) -> Self {
        Self {
            pull_request: pr.clone(),
            pr_body: conversation.pr_body,
            comments: conversation.comments,
            linked_issues: conversation.linked_issues,
            diff: diff.diff,
            conversation_truncated: conversation.truncated,
        }
    }
}

/// Builds [`ContextBundle`]s. Holds no per-call state, so one service can
/// serve concurrent callers.
pub struct PullRequestContextService<'a> {
    conversations: &'a dyn ConversationSource,
    diffs: &'a dyn DiffSource,
    estimator: &'a dyn TokenEstimator,
    counter: &'a dyn ExactTokenCounter,
}

impl<'a> PullRequestContextService<'a> {
    pub fn new(
        conversations: &'a dyn ConversationSource,
        diffs: &'a dyn DiffSource,
        estimator: &'a dyn TokenEstimator,
        counter: &'a dyn ExactTokenCounter,
    ) -> Self {
        Self {
            conversations,
            diffs,
            estimator,
            counter,
        }
    }

    /// Comments and linked issues, best-effort.
    pub async fn conversation(&self, pr: &PullRequestRef) -> ConversationContext {
        GraphQlPaginator::new(self.conversations).collect(pr).await
    }

    /// Diff fitted to `budget`, best-effort.
    pub async fn diff(&self, pr: &PullRequestRef, budget: &TokenBudget) -> DiffContext {
        DiffAssembler::new(self.diffs, self.estimator, self.counter)
            .assemble(pr, budget)
            .await
    }

    /// Fetch both halves concurrently. Neither half can fail the other.
    pub async fn build(&self, pr: &PullRequestRef, budget: &TokenBudget) -> ContextBundle {
        let (conversation, diff) = tokio::join!(self.conversation(pr), self.diff(pr, budget));
        let bundle = ContextBundle::from_parts(pr, conversation, diff);

        info!(
            pr = %pr,
            comments = bundle.comments.len(),
            linked_issues = bundle.linked_issues.len(),
            diff_included = bundle.diff.is_some(),
            truncated = bundle.conversation_truncated,
            "Built pull request context bundle"
        );
        bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::{CharRatioEstimator, EstimatingCounter};
    use crate::conversation::paginator::MockConversationSource;
    use crate::conversation::{Author, CommentNode, Connection, PullRequestPage};
    use crate::diff::assembler::MockDiffSource;
    use crate::error::GitHubError;

    fn pr() -> PullRequestRef {
        PullRequestRef::new("acme", "widgets", 21)
    }

    #[tokio::test]
    async fn test_diff_failure_keeps_conversation() {
        let mut conversations = MockConversationSource::new();
        conversations.expect_fetch_page().times(1).returning(|_, _, _| {
            Ok(PullRequestPage {
                body: Some("desc".into()),
                comments: Connection {
                    nodes: vec![CommentNode {
                        id: "c1".into(),
                        body: "looks good".into(),
                        author: Some(Author::new("alice", "User")),
                    }],
                    ..Default::default()
                },
                ..Default::default()
            })
        });
        let mut diffs = MockDiffSource::new();
        diffs
            .expect_fetch_diff()
            .returning(|_| Err(GitHubError::Status { status: 500, body: String::new() }));

        let est = CharRatioEstimator::default();
        let counter = EstimatingCounter::new(CharRatioEstimator::default());
        let service = PullRequestContextService::new(&conversations, &diffs, &est, &counter);

        let bundle = service.build(&pr(), &TokenBudget::new(0, 1_000)).await;
        assert_eq!(bundle.comments.len(), 1);
        assert_eq!(bundle.pr_body.as_deref(), Some("desc"));
        assert!(bundle.diff.is_none());
        assert_eq!(bundle.pull_request, pr());
    }

    #[tokio::test]
    async fn test_conversation_failure_keeps_diff() {
        let mut conversations = MockConversationSource::new();
        conversations
            .expect_fetch_page()
            .returning(|_, _, _| Err(GitHubError::GraphQl("nope".into())));
        let mut diffs = MockDiffSource::new();
        diffs
            .expect_fetch_diff()
            .returning(|_| Ok("diff --git a/a.rs b/a.rs\n+fn a() {}\n".to_string()));

        let est = CharRatioEstimator::default();
        let counter = EstimatingCounter::new(CharRatioEstimator::default());
        let service = PullRequestContextService::new(&conversations, &diffs, &est, &counter);

        let bundle = service.build(&pr(), &TokenBudget::new(0, 1_000)).await;
        assert!(bundle.comments.is_empty());
        assert!(bundle.linked_issues.is_empty());
        assert_eq!(bundle.diff.as_deref(), Some("diff --git a/a.rs b/a.rs\n+fn a() {}"));
    }
}
