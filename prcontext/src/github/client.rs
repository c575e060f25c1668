//! `reqwest` client for the GitHub GraphQL and REST APIs.
//!
//! Timeout policy lives here; callers never retry. The response body is
//! decoded into typed structs once, at this boundary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Serialize;
use tracing::debug;

use super::query::{
    ConversationData, ConversationVariables, GraphQlRequest, GraphQlResponse,
    PULL_REQUEST_CONVERSATION_QUERY,
};
use crate::conversation::{ConversationSource, PullRequestPage};
use crate::diff::DiffSource;
use crate::error::GitHubError;
use crate::pull_request::PullRequestRef;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const DIFF_MEDIA_TYPE: &str = "application/vnd.github.diff";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("prcontext/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// REST base URL; GraphQL is served at `{api_url}/graphql`.
    pub api_url: String,
    pub token: String,
    pub timeout: Duration,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Authenticated GitHub client. Cheap to clone (shared connection pool).
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: String,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    pub fn new(config: GitHubClientConfig) -> Result<Self, GitHubError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token,
        })
    }

    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.api_url)
    }

    pub fn pull_request_url(&self, pr: &PullRequestRef) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_url, pr.owner, pr.repo, pr.number
        )
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// POST a query and return the raw response text.
    async fn graphql_request<V: Serialize>(
        &self,
        query: &str,
        variables: V,
    ) -> Result<String, GitHubError> {
        let resp = self
            .client
            .post(self.graphql_url())
            .json(&GraphQlRequest { query, variables })
            .header(header::AUTHORIZATION, self.auth_header())
            .header(header::ACCEPT, JSON_MEDIA_TYPE)
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(GitHubError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

/// Decode a conversation query response into the `pullRequest` node.
pub fn decode_conversation_page(
    text: &str,
    pr: &PullRequestRef,
) -> Result<PullRequestPage, GitHubError> {
    let response: GraphQlResponse<ConversationData> =
        serde_json::from_str(text).map_err(|e| GitHubError::Parse(e.to_string()))?;

    if !response.errors.is_empty() {
        let messages = response
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(GitHubError::GraphQl(messages));
    }

    response
        .data
        .and_then(|d| d.repository)
        .and_then(|r| r.pull_request)
        .ok_or_else(|| GitHubError::NotFound(pr.to_string()))
}

#[async_trait]
impl ConversationSource for GitHubClient {
    async fn fetch_page(
        &self,
        pr: &PullRequestRef,
        comments_cursor: Option<String>,
        reviews_cursor: Option<String>,
    ) -> Result<PullRequestPage, GitHubError> {
        debug!(
            pr = %pr,
            comments_cursor = comments_cursor.as_deref().unwrap_or("-"),
            reviews_cursor = reviews_cursor.as_deref().unwrap_or("-"),
            "Requesting conversation page"
        );
        let variables = ConversationVariables {
            owner: pr.owner.clone(),
            repo: pr.repo.clone(),
            number: pr.number,
            comments_cursor,
            reviews_cursor,
        };
        let text = self
            .graphql_request(PULL_REQUEST_CONVERSATION_QUERY, variables)
            .await?;
        decode_conversation_page(&text, pr)
    }
}

#[async_trait]
impl DiffSource for GitHubClient {
    async fn fetch_diff(&self, pr: &PullRequestRef) -> Result<String, GitHubError> {
        let resp = self
            .client
            .get(self.pull_request_url(pr))
            .header(header::AUTHORIZATION, self.auth_header())
            .header(header::ACCEPT, DIFF_MEDIA_TYPE)
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GitHubError::NotFound(pr.to_string()));
        }
        if !status.is_success() {
            return Err(GitHubError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        debug!(pr = %pr, bytes = text.len(), "Fetched pull request diff");
        Ok(text)
    }
}
