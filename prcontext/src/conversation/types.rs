//! Conversation shapes: the typed GraphQL page decoded at the transport
//! boundary, and the normalized caller-facing records built from it.

use serde::{Deserialize, Serialize};

/// `pageInfo { hasNextPage endCursor }` for one paginated collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCursor {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// A GraphQL connection: `{ nodes, pageInfo }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
    #[serde(default)]
    pub page_info: PageCursor,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            page_info: PageCursor::default(),
        }
    }
}

/// Comment author. `kind` is the GraphQL `__typename` aliased to `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub login: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Author {
    pub fn new(login: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            kind: kind.into(),
        }
    }

    /// Stand-in for a deleted account (`author: null` upstream).
    pub fn ghost() -> Self {
        Self::new("ghost", "User")
    }
}

/// Issue-style comment or review comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNode {
    pub id: String,
    #[serde(default)]
    pub body: String,
    pub author: Option<Author>,
}

/// Review with its (single page of) nested comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewNode {
    #[serde(default)]
    pub comments: Connection<CommentNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRepository {
    pub name: String,
    pub owner: RepositoryOwner,
}

/// Entry of `closingIssuesReferences`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueNode {
    pub number: u64,
    pub url: String,
    #[serde(default)]
    pub body: String,
    pub repository: IssueRepository,
}

/// The `pullRequest` node of one combined page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestPage {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub closing_issues_references: Connection<IssueNode>,
    #[serde(default)]
    pub reviews: Connection<ReviewNode>,
    #[serde(default)]
    pub comments: Connection<CommentNode>,
}

/// Caller-facing comment author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentUser {
    pub login: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Normalized comment, one per non-bot [`CommentNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedComment {
    pub id: String,
    pub body: String,
    pub org: String,
    pub repo: String,
    pub issue_url: String,
    pub user: CommentUser,
}

/// An issue the pull request declares it closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedIssue {
    pub number: u64,
    pub owner: String,
    pub repo: String,
    pub url: String,
    pub body: String,
}

impl From<IssueNode> for LinkedIssue {
    fn from(node: IssueNode) -> Self {
        Self {
            number: node.number,
            owner: node.repository.owner.login,
            repo: node.repository.name,
            url: node.url,
            body: node.body,
        }
    }
}

/// Conversation portion of the bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Non-bot comments in page-fetch order.
    pub comments: Vec<SimplifiedComment>,
    pub linked_issues: Vec<LinkedIssue>,
    /// Pull request description, from the first page.
    pub pr_body: Option<String>,
    /// The page ceiling was reached before both collections were exhausted.
    pub truncated: bool,
}
