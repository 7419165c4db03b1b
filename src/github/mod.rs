// src/github/mod.rs
//! GitHub data model shared by the client and the contributor aggregator.
//!
//! Only the fields the site actually displays are modelled; serde ignores the rest
//! of GitHub's (large) payloads.

pub mod cache;
pub mod client;

pub use client::GithubClient;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Opaque bearer token for the GitHub REST API.
///
/// Never printed: `Debug` redacts the value so it cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for an empty or whitespace-only token.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(len={})", self.0.len())
    }
}

/// Why a single upstream fetch did not produce a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Missing GitHub token")]
    MissingCredential,
    /// Non-2xx answer from GitHub; carries the upstream status.
    #[error("GitHub API Error: {reason}")]
    Upstream { status: u16, reason: String },
    #[error("Network error: {0}")]
    Transport(String),
    /// 2xx answer whose body did not match the expected shape.
    #[error("Invalid GitHub response: {0}")]
    Decode(String),
}

impl FetchError {
    /// HTTP-style status code for this failure.
    pub fn status(&self) -> u16 {
        match self {
            FetchError::Upstream { status, .. } => *status,
            FetchError::MissingCredential | FetchError::Transport(_) | FetchError::Decode(_) => {
                500
            }
        }
    }
}

/// Either the parsed payload or the failure, never both.
pub type FetchResult<T> = Result<T, FetchError>;

/// One entry of `GET /repos/{owner}/{repo}/contributors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub contributions: u64,
    #[serde(default)]
    pub html_url: String,
}

/// A contributor whose `contributions` is the sum over every repository it appeared in.
/// Display fields are the ones seen first.
pub type AggregatedContributor = Contributor;

/// Subset of `GET /repos/{owner}/{repo}`.
///
/// Absent counters stay `None` here; callers decide how to default them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    #[serde(default)]
    pub stargazers_count: Option<u64>,
}

impl RepoInfo {
    pub fn stars(&self) -> u64 {
        self.stargazers_count.unwrap_or(0)
    }
}

/// Subset of `GET /users/{owner}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub followers: Option<u64>,
}

impl UserInfo {
    pub fn followers(&self) -> u64 {
        self.followers.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_rejects_blank_tokens() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
        let c = Credential::new(" ghp_abc ").expect("non-empty token");
        assert_eq!(c.expose(), "ghp_abc");
    }

    #[test]
    fn credential_debug_is_redacted() {
        let c = Credential::new("ghp_secret").unwrap();
        let shown = format!("{c:?}");
        assert!(!shown.contains("ghp_secret"), "debug output leaked token: {shown}");
    }

    #[test]
    fn error_statuses_and_messages() {
        assert_eq!(FetchError::MissingCredential.status(), 500);
        assert_eq!(FetchError::Transport("dns".into()).status(), 500);
        assert_eq!(FetchError::Decode("eof".into()).status(), 500);

        let upstream = FetchError::Upstream {
            status: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(upstream.status(), 404);
        assert_eq!(upstream.to_string(), "GitHub API Error: Not Found");
        assert_eq!(
            FetchError::MissingCredential.to_string(),
            "Missing GitHub token"
        );
    }

    #[test]
    fn optional_counters_preserve_absence() {
        let absent: RepoInfo = serde_json::from_str(r#"{"name":"cli"}"#).unwrap();
        assert_eq!(absent.stargazers_count, None);
        assert_eq!(absent.stars(), 0);

        let zero: RepoInfo = serde_json::from_str(r#"{"stargazers_count":0}"#).unwrap();
        assert_eq!(zero.stargazers_count, Some(0));

        let user: UserInfo = serde_json::from_str(r#"{"login":"x","followers":12}"#).unwrap();
        assert_eq!(user.followers(), 12);
        assert_eq!(UserInfo::default().followers(), 0);
    }

    #[test]
    fn contributor_ignores_extra_fields() {
        let c: Contributor = serde_json::from_str(
            r#"{"login":"a","id":1,"avatar_url":"u","contributions":3,"html_url":"h","type":"User"}"#,
        )
        .unwrap();
        assert_eq!(c.login, "a");
        assert_eq!(c.contributions, 3);
    }
}
