use anyhow::{Context, Result};
use prcontext::{GitHubClientConfig, TokenBudget, TokenizerEncoding, TokenizerOptions};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

/// First of `vars` that is set to a non-empty value.
fn env_first_non_empty(vars: &[&str]) -> Option<String> {
    vars.iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
}

fn env_parse<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// GitHub API access.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    pub api_url: String,
    /// Personal access or app installation token.
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_url: env_or("GITHUB_API_URL", prcontext::github::DEFAULT_API_URL),
            token: env_first_non_empty(&["GITHUB_TOKEN", "GH_TOKEN"]),
            timeout_secs: env_parse("PRCONTEXT_TIMEOUT_SECS", 30),
        }
    }
}

/// Exact tokenizer selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenizerSettings {
    pub encoding: TokenizerEncoding,
    pub allow_special_tokens: bool,
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        Self {
            encoding: env_parse("PRCONTEXT_ENCODING", TokenizerEncoding::default()),
            allow_special_tokens: false,
        }
    }
}

/// Token budget handed to the diff allocator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BudgetSettings {
    pub running_token_count: u64,
    pub tokens_remaining: u64,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            running_token_count: env_parse("PRCONTEXT_RUNNING_TOKENS", 0),
            tokens_remaining: env_parse("PRCONTEXT_TOKENS_REMAINING", 100_000),
        }
    }
}

/// Top-level configuration: env defaults, optionally overridden by a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrContextConfig {
    pub github: GitHubSettings,
    pub tokenizer: TokenizerSettings,
    pub budget: BudgetSettings,
}

impl PrContextConfig {
    /// Load from `path` if given; fields missing from the file keep their
    /// env-derived defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                Self::from_toml(&text)
                    .with_context(|| format!("Failed to parse config {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn client_config(&self) -> Result<GitHubClientConfig> {
        let token = self
            .github
            .token
            .clone()
            .context("No GitHub token configured. Set GITHUB_TOKEN or github.token")?;
        Ok(GitHubClientConfig {
            api_url: self.github.api_url.clone(),
            token,
            timeout: Duration::from_secs(self.github.timeout_secs),
        })
    }

    pub fn tokenizer_options(&self) -> TokenizerOptions {
        TokenizerOptions {
            encoding: self.tokenizer.encoding,
            allow_special_tokens: self.tokenizer.allow_special_tokens,
        }
    }

    pub fn token_budget(&self) -> TokenBudget {
        TokenBudget::new(
            self.budget.running_token_count,
            self.budget.tokens_remaining,
        )
    }
}
