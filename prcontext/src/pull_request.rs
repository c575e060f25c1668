//! Pull request identifier shared by every source.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PullRequestRefError;

/// Identifies one pull request: `owner/repo#number`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Web URL of the conversation the comments belong to.
    pub fn issue_url(&self) -> String {
        format!(
            "https://github.com/{}/{}/issues/{}",
            self.owner, self.repo, self.number
        )
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

impl FromStr for PullRequestRef {
    type Err = PullRequestRefError;

    /// Accepts `owner/repo#N`, `owner/repo/N`, and
    /// `https://github.com/owner/repo/pull/N` (trailing path segments such as
    /// `/files`, a query string, or a fragment are ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let malformed = || PullRequestRefError::Malformed(input.to_string());

        let path = input
            .strip_prefix("https://")
            .or_else(|| input.strip_prefix("http://"))
            .map(|rest| {
                let rest = rest.split(['#', '?']).next().unwrap_or(rest);
                rest.split_once('/').map(|(_, p)| p).unwrap_or("")
            })
            .unwrap_or(input);

        let (owner, repo, number) = if let Some((repo_path, number)) = path.split_once('#') {
            let (owner, repo) = repo_path.split_once('/').ok_or_else(malformed)?;
            (owner, repo, number)
        } else {
            let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
            match parts.as_slice() {
                [owner, repo, "pull", number, ..] | [owner, repo, "pulls", number, ..] => {
                    (*owner, *repo, *number)
                }
                [owner, repo, number] => (*owner, *repo, *number),
                _ => return Err(malformed()),
            }
        };

        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return Err(malformed());
        }
        let number = number
            .parse::<u64>()
            .map_err(|_| PullRequestRefError::InvalidNumber(number.to_string()))?;

        Ok(Self::new(owner, repo, number))
    }
}
