//! GraphQL document and typed envelopes for the combined conversation query.

use serde::{Deserialize, Serialize};

use crate::conversation::PullRequestPage;

/// Page size for every connection in the query.
pub const PAGE_SIZE: u32 = 100;

/// Comments and reviews advance independently; closing issues are a single
/// page. `type: __typename` exposes the actor kind as `author.type`.
pub const PULL_REQUEST_CONVERSATION_QUERY: &str = r#"
query PullRequestConversation(
  $owner: String!
  $repo: String!
  $number: Int!
  $commentsCursor: String
  $reviewsCursor: String
) {
  repository(owner: $owner, name: $repo) {
    pullRequest(number: $number) {
      body
      closingIssuesReferences(first: 100) {
        nodes {
          number
          url
          body
          repository {
            name
            owner { login }
          }
        }
      }
      reviews(first: 100, after: $reviewsCursor) {
        nodes {
          comments(first: 100) {
            nodes {
              id
              body
              author { login type: __typename }
            }
          }
        }
        pageInfo { hasNextPage endCursor }
      }
      comments(first: 100, after: $commentsCursor) {
        nodes {
          id
          body
          author { login type: __typename }
        }
        pageInfo { hasNextPage endCursor }
      }
    }
  }
}
"#;

/// Variables for [`PULL_REQUEST_CONVERSATION_QUERY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationVariables {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub comments_cursor: Option<String>,
    pub reviews_cursor: Option<String>,
}

/// `{ "query": ..., "variables": ... }` request body.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

/// `{ "data": ..., "errors": [...] }` response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationData {
    pub repository: Option<RepositoryData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryData {
    pub pull_request: Option<PullRequestPage>,
}
